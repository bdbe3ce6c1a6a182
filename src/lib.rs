//! Библиотека для идентификации устройств на шине
//! [PCI (Peripheral Component Interconnect)](https://en.wikipedia.org/wiki/Peripheral_Component_Interconnect):
//! декодирование идентификационных регистров
//! [пространства конфигурации](https://en.wikipedia.org/wiki/PCI_configuration_space),
//! обнаружение ресурсов устройства через его Base Address Registers (BAR)
//! и выбор пути подключения драйвера по классу устройства.

#![deny(warnings)]
#![no_std]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(missing_docs)]

extern crate alloc;

pub use bar::Resource;
pub use class::{
    Class,
    ClassCode,
};
pub use config_space::ConfigSpace;
pub use device::{
    Attachment,
    CommandAndStatusRegister,
    Device,
    Interrupt,
    State,
    UnsupportedVendor,
};
pub use device_id::DeviceId;
pub use id::Id;
pub use nic::Nic;
pub use routing_id::RoutingId;

/// Модуль для работы с регистрами адресов памяти и
/// [портов ввода--вывода](https://en.wikipedia.org/wiki/Memory-mapped_I/O_and_port-mapped_I/O)
/// PCI--устройств --- Base Address Register (BAR) ---
/// и ресурсами, которые они объявляют.
mod bar;

/// Класс PCI--устройства и таблицы классификации.
mod class;

/// Модуль для работы с
/// [пространством конфигурации PCI](https://en.wikipedia.org/wiki/PCI_configuration_space).
mod config_space;

/// Модуль для работы с описанием PCI--устройства.
mod device;

/// Идентификатор PCI--устройства.
mod device_id;

/// Единый тип для идентификаторов PCI устройств, производителей, классов и т.д.
mod id;

/// Драйвер сетевой карты, создаваемый при диспетчеризации.
mod nic;

/// Географические координаты PCI--устройства.
mod routing_id;

#[cfg(test)]
mod test;
