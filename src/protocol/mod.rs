pub mod device;
pub mod modbus;
