pub mod delivery;
pub mod newsletter;
pub mod pipeline;

pub use delivery::{deliver, DeliveryReport, SmtpMailer};
pub use newsletter::DigestAssembler;
pub use pipeline::{DigestPipeline, DigestRun};

pub mod prelude {
    pub use super::{DeliveryReport, DigestAssembler, DigestPipeline, DigestRun, SmtpMailer};
    pub use nd_core::{Article, DigestConfig, Error, Result};
}
