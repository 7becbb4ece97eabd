pub const USERNAME_MIN_LENGTH: usize = 3;
pub const TEMPLATE_TITLE_MIN_LENGTH: usize = 1;
pub const TEMPLATE_MIN_DURATION_DAYS: u32 = 1;
