mod template;
pub use template::*;

mod page;
pub use page::*;

mod user;
pub use user::*;

mod call;
pub use call::*;
