mod interface;
mod std_refill;
#[cfg(feature = "async-smol")]
mod smol_refill;
#[cfg(feature = "async-tokio")]
mod tokio_refill;

pub use interface::*;
pub use std_refill::*;
#[cfg_attr(docsrs, doc(cfg(feature = "async-smol")))]
#[cfg(feature = "async-smol")]
pub use smol_refill::*;
#[cfg_attr(docsrs, doc(cfg(feature = "async-tokio")))]
#[cfg(feature = "async-tokio")]
pub use tokio_refill::*;
