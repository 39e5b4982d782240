mod command;
mod controller;
mod reader;

pub use command::{GazeReadout, ReaderEvent, SessionCommand, SessionSnapshot};
pub use controller::SessionController;
pub use reader::ReaderSession;
