pub mod locale;
pub mod view;

pub use locale::Locale;
pub use view::ViewSession;
