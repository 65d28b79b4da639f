//! UI Components
//!
//! Pages and the pieces they are built from.

mod form_field;
mod home_page;
mod loader;
mod login_page;
mod new_todo_form;
mod register_page;
mod todo_row;

pub use form_field::FormField;
pub use home_page::HomePage;
pub use loader::Loader;
pub use login_page::LoginPage;
pub use new_todo_form::NewTodoForm;
pub use register_page::RegisterPage;
pub use todo_row::TodoRow;
