use core::fmt;

use derive_getters::Getters;
use num_enum::TryFromPrimitive;

use super::{
    ConfigSpace,
    Id,
    RoutingId,
    device_id::CLASS_REVISION_ADDRESS,
};

/// Известные коды классов PCI--устройств.
///
/// Числовое значение варианта совпадает со старшим байтом
/// регистра класса и ревизии.
#[derive(Clone, Copy, Debug, Eq, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum ClassCode {
    /// Устройство выпущено до введения кодов классов.
    TooOld = 0,

    /// Контроллер накопителей.
    MassStorage = 1,

    /// Сетевая карта.
    Network = 2,

    /// Видеокарта.
    Display = 3,

    /// Мультимедийный контроллер.
    Multimedia = 4,

    /// Контроллер памяти.
    Memory = 5,

    /// Мост.
    Bridge = 6,
}

/// Класс PCI--устройства.
///
/// Декодируется из регистра класса и ревизии один раз при создании
/// описания устройства и далее не пересчитывается.
#[derive(Clone, Copy, Debug, Default, Getters)]
pub struct Class {
    /// Идентификатор класса PCI--устройства.
    class: Id<u8>,

    /// Идентификатор подкласса PCI--устройства.
    /// Его интерпретация зависит от класса.
    subclass: Id<u8>,

    /// Идентификатор программного интерфейса PCI--устройства.
    interface: Id<u8>,
}

impl Class {
    /// Читает класс PCI--устройства, адресуемого `routing_id`,
    /// из пространства конфигурации `config_space`.
    pub(super) fn new(
        config_space: &mut impl ConfigSpace,
        routing_id: RoutingId,
    ) -> Self {
        let class_data = unsafe { config_space.read(routing_id, CLASS_REVISION_ADDRESS) };

        let class_byte = (class_data >> 24) as u8;
        let subclass_byte = ((class_data >> 16) & 0xFF) as u8;
        let interface_byte = ((class_data >> 8) & 0xFF) as u8;

        let code = ClassCode::try_from(class_byte).ok();

        Self {
            class: Id::new(class_byte, class_name(class_byte)),
            subclass: Id::new(subclass_byte, subclass_name(code, subclass_byte)),
            interface: Id::new(interface_byte, None),
        }
    }

    /// Возвращает известный код класса устройства или
    /// [`None`], если код класса не известен.
    pub fn code(&self) -> Option<ClassCode> {
        ClassCode::try_from(self.class.id()).ok()
    }
}

impl fmt::Display for Class {
    fn fmt(
        &self,
        formatter: &mut fmt::Formatter,
    ) -> fmt::Result {
        if self.subclass.name().is_some() {
            write!(formatter, "{} {}", self.subclass, self.class)
        } else {
            write!(formatter, "{}", self.class)
        }
    }
}

/// Имена известных классов PCI--устройств, индекс --- код класса.
const CLASS_NAMES: [&str; 7] = [
    "Too-Old-To-Tell",
    "Mass Storage Controller",
    "Network Controller",
    "Display Controller",
    "Multimedia Controller",
    "Memory Controller",
    "Bridge",
];

/// Имена подклассов мостов.
const BRIDGE_SUBCLASSES: [&str; 3] = ["Host", "ISA", "Other"];

/// Имена подклассов сетевых карт.
const NETWORK_SUBCLASSES: [&str; 2] = ["Ethernet", "Other"];

/// Возвращает имя класса по его коду, если код известен.
fn class_name(class: u8) -> Option<&'static str> {
    CLASS_NAMES.get(usize::from(class)).copied()
}

/// Возвращает имя подкласса для классов,
/// у которых есть таблица имён подклассов.
///
/// Определено для любого значения байта подкласса:
/// коды, выходящие за пределы таблицы,
/// отображаются в её последнюю запись --- `"Other"`.
pub(super) fn subclass_name(
    code: Option<ClassCode>,
    subclass: u8,
) -> Option<&'static str> {
    let table: &[&'static str] = match code? {
        ClassCode::Bridge => &BRIDGE_SUBCLASSES,
        ClassCode::Network => &NETWORK_SUBCLASSES,
        _ => return None,
    };

    Some(table[usize::from(subclass).min(table.len() - 1)])
}
