mod home;
pub use home::Home;

mod login;
pub use login::Login;

mod register;
pub use register::Register;

mod users;
pub use users::Users;

mod add_edit;
pub use add_edit::{UserAdd, UserEdit};
