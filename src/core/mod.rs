pub mod client;
pub mod inbox;
pub mod locator;
pub mod parser;
pub mod sender;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{
    HistoryEntry, InboxReport, ModemHandle, ModemState, SendOutcome, SmsMessage, SmsResource,
};
pub use crate::domain::ports::{ConfigProvider, DeviceInterface, HistoryLog};
pub use crate::utils::error::Result;
