pub mod page_navigator;

pub use page_navigator::{parse_page_input, NavigationOutcome, PageNavigator};
