pub mod adc;
pub mod led;
pub mod pins;
pub mod spi;
pub mod usart;

pub use adc::AnalogFrontEnd;
pub use led::Led;
pub use pins::{MasterPins, ServantPins};
pub use spi::{ChipSelect, SpiMaster, SpiServant};
pub use usart::Usart;
