pub mod form;
pub mod relay;
pub mod thread;

pub use form::{ContactForm, Field, FormError, SubmitStatus};
pub use relay::RelayConfig;
