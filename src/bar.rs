use core::fmt;

use tracing::debug;

use super::{
    ConfigSpace,
    RoutingId,
};

/// Ресурс PCI--устройства, объявленный одним из его BAR--регистров ---
/// диапазон
/// [портов ввода--вывода](https://en.wikipedia.org/wiki/Memory-mapped_I/O_and_port-mapped_I/O)
/// либо диапазон физической памяти для
/// [Memory--mapped I/O (MMIO)](https://en.wikipedia.org/wiki/Memory-mapped_I/O).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Resource {
    /// Диапазон
    /// [портов ввода--вывода](https://en.wikipedia.org/wiki/Memory-mapped_I/O_and_port-mapped_I/O).
    Io {
        /// Начало диапазона.
        /// Из него вырезаны два младших служебных бита BAR--регистра.
        start: u32,

        /// Размер диапазона, степень двойки.
        /// `0`, если устройство не декодирует ни одного адресного бита.
        size: u32,
    },

    /// Диапазон физической памяти
    /// [Memory--mapped I/O (MMIO)](https://en.wikipedia.org/wiki/Memory-mapped_I/O).
    Memory {
        /// Начало диапазона.
        /// Из него вырезаны четыре младших служебных бита BAR--регистра.
        start: u32,

        /// Размер диапазона, степень двойки.
        /// `0`, если устройство не декодирует ни одного адресного бита.
        size: u32,
    },
}

impl Resource {
    /// Читает BAR--регистр PCI--устройства, адресуемого `routing_id`,
    /// по смещению `offset` в пространстве конфигурации `config_space` и
    /// декодирует объявленный им ресурс.
    ///
    /// Возвращает [`None`], если регистр прочитался нулём ---
    /// устройство либо вовсе не реализует этот BAR,
    /// либо объявляет через него область нулевой длины;
    /// по нулевому значению эти случаи неразличимы,
    /// и оба пропускаются одинаково.
    ///
    /// Над регистром выполняется строгая последовательность
    /// чтение --- запись шаблона из одних единиц --- чтение,
    /// см. [`ConfigSpace::probe_size_mask`].
    pub(super) fn new(
        config_space: &mut impl ConfigSpace,
        routing_id: RoutingId,
        offset: usize,
    ) -> Option<Self> {
        let bar_value = unsafe { config_space.read(routing_id, offset) };
        if bar_value == 0 {
            return None;
        }

        let size_mask = unsafe { config_space.probe_size_mask(routing_id, offset) };

        let resource = if bar_value & IO_RESOURCE_BIT != 0 {
            Self::Io {
                start: bar_value & IO_ADDRESS_MASK,
                size: decode_size(size_mask, IO_ADDRESS_MASK & 0xFFFF),
            }
        } else {
            Self::Memory {
                start: bar_value & MEMORY_ADDRESS_MASK,
                size: decode_size(size_mask, MEMORY_ADDRESS_MASK),
            }
        };

        debug!(
            offset,
            value = format_args!("{bar_value:#010X}"),
            size_mask = format_args!("{size_mask:#010X}"),
            %resource,
        );

        Some(resource)
    }

    /// Возвращает начало диапазона ресурса.
    pub fn start(&self) -> u32 {
        match *self {
            Self::Io { start, .. } | Self::Memory { start, .. } => start,
        }
    }

    /// Возвращает размер диапазона ресурса.
    pub fn size(&self) -> u32 {
        match *self {
            Self::Io { size, .. } | Self::Memory { size, .. } => size,
        }
    }

    /// Возвращает `true`, если ресурс --- диапазон портов ввода--вывода.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

impl fmt::Display for Resource {
    fn fmt(
        &self,
        formatter: &mut fmt::Formatter,
    ) -> fmt::Result {
        let end = u64::from(self.start()) + u64::from(self.size());

        match *self {
            Self::Io { start, .. } => {
                write!(formatter, "I/O {{ [{start:#06X}, {end:#06X}) }}")
            },

            Self::Memory { start, .. } => {
                write!(formatter, "Memory {{ [{start:#010X}, {end:#010X}) }}")
            },
        }
    }
}

/// Вычисляет размер области, декодируемой BAR--регистром.
///
/// `size_mask` --- значение, прочитанное из регистра после записи
/// шаблона из одних единиц,
/// `address_mask` --- маска адресных битов для ресурсов этого типа.
/// Биты младше размера области устройство жёстко держит в нуле,
/// поэтому размер --- это младший установленный бит значения
/// `size_mask & address_mask`.
/// Если в этом значении не установлен ни один бит,
/// BAR не декодирует ни одного адресного бита и размер равен нулю.
pub(super) fn decode_size(
    size_mask: u32,
    address_mask: u32,
) -> u32 {
    let significant = size_mask & address_mask;

    significant & significant.wrapping_neg()
}

/// Бит BAR--регистра, отличающий ресурс портов ввода--вывода
/// от ресурса памяти.
pub(super) const IO_RESOURCE_BIT: u32 = 1 << 0;

/// Маска адресных битов BAR--регистра с ресурсом портов ввода--вывода.
/// Для определения размера значимы только младшие 16 бит.
pub(super) const IO_ADDRESS_MASK: u32 = 0xFFFF_FFFC;

/// Маска адресных битов BAR--регистра с ресурсом памяти.
pub(super) const MEMORY_ADDRESS_MASK: u32 = 0xFFFF_FFF0;

/// Смещение первого BAR--регистра в пространстве конфигурации PCI--устройства.
pub(super) const BARS_START_ADDRESS: usize = 0x10;

/// Смещение следующего за последним BAR--регистром
/// в пространстве конфигурации PCI--устройства.
pub(super) const BARS_END_ADDRESS: usize = 0x28;
