use derive_more::Display;
use tracing::info;

use super::Device;

/// Драйвер сетевой карты Virtio.
///
/// Пока это только точка подключения:
/// драйвер забирает устройство во владение вместе с
/// привязанными ресурсами и назначенным прерыванием.
/// Согласование протокола Virtio здесь сознательно не выполняется.
#[derive(Debug, Display)]
#[display("Nic {{ {} }}", device)]
pub struct Nic {
    /// PCI--устройство, которым владеет драйвер.
    device: Device,
}

impl Nic {
    /// Создаёт драйвер поверх устройства с привязанными ресурсами.
    ///
    /// # Panics
    ///
    /// Работа драйвера построена на портах ввода--вывода,
    /// поэтому устройство без такого ресурса ---
    /// невосстановимая ошибка, вызывающая панику.
    pub(super) fn new(device: Device) -> Self {
        info!(
            io_base = format_args!("{:#06X}", device.io_base()),
            interrupt = ?device.interrupt(),
            "NIC attached",
        );

        Self { device }
    }

    /// Возвращает PCI--устройство, которым владеет драйвер.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Возвращает начало основного ресурса портов ввода--вывода устройства.
    ///
    /// # Panics
    ///
    /// Паникует, если у устройства нет ресурса портов ввода--вывода.
    pub fn io_base(&self) -> u32 {
        self.device.io_base()
    }
}
