pub mod constant;
pub mod error;
pub mod fixtures;
pub mod setup;

pub use error::TestError;
pub use setup::TestSetup;

pub mod prelude {
    pub use crate::{
        constant::*, fixtures::eve::data, test_setup_with_eve_tables, test_setup_with_tables,
        TestError, TestSetup,
    };
}
