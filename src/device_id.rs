use derive_getters::Getters;
use derive_more::Display;

use super::{
    ConfigSpace,
    Id,
    RoutingId,
};

/// Идентификатор PCI--устройства.
#[derive(Clone, Copy, Debug, Default, Display, Getters)]
#[display("{}, rev. {} ({})", device, revision, vendor)]
pub struct DeviceId {
    /// Идентификатор устройства.
    device: Id<u16>,

    /// Идентификатор производителя устройства.
    vendor: Id<u16>,

    /// Номер ревизии устройства.
    revision: u8,
}

impl DeviceId {
    /// Читает идентификатор PCI--устройства, адресуемого `routing_id`,
    /// из пространства конфигурации `config_space`.
    /// Если по адресу `routing_id` нет устройства, возвращает [`None`].
    pub(super) fn new(
        config_space: &mut impl ConfigSpace,
        routing_id: RoutingId,
    ) -> Option<Self> {
        let vendor_device_data = unsafe { config_space.read(routing_id, VENDOR_ID_ADDRESS) };
        let (device, vendor) = vendor_device(vendor_device_data)?;

        let revision_data = unsafe { config_space.read(routing_id, CLASS_REVISION_ADDRESS) };
        let revision = (revision_data & 0xFF) as u8;

        Some(Self {
            device,
            vendor,
            revision,
        })
    }
}

/// Возвращает пару из идентификатора устройства и
/// идентификатора производителя устройства,
/// закодированных в значении `data`:
/// идентификатор производителя --- в младших 16 битах,
/// идентификатор устройства --- в старших.
/// Также подходит для декодирования пары из
/// идентификатора подустройства и идентификатора производителя подустройства.
/// Если идентификатор производителя равен признаку отсутствия устройства,
/// возвращает [`None`].
pub(super) fn vendor_device(data: u32) -> Option<(Id<u16>, Id<u16>)> {
    let vendor_id = (data & 0xFFFF) as u16;
    let device_id = (data >> 16) as u16;

    if vendor_id == NO_DEVICE {
        return None;
    }

    let device = Id::new(device_id, None);
    let vendor = Id::new(vendor_id, vendor_name(vendor_id));

    Some((device, vendor))
}

/// Возвращает имя производителя по его идентификатору,
/// если производитель есть в таблице известных.
fn vendor_name(vendor: u16) -> Option<&'static str> {
    VENDORS
        .iter()
        .find(|(id, _)| *id == vendor)
        .map(|(_, name)| *name)
}

/// Таблица известных производителей PCI--устройств.
const VENDORS: [(u16, &str); 5] = [
    (VENDOR_INTEL, "Intel Corp."),
    (VENDOR_CIRRUS, "Cirrus Logic"),
    (VENDOR_REALTEK, "Realtek Semi.Corp."),
    (VENDOR_VIRTIO, "Virtio (Rusty Russell)"),
    (VENDOR_AMD, "AMD"),
];

/// Идентификатор производителя Intel.
pub(super) const VENDOR_INTEL: u16 = 0x8086;

/// Идентификатор производителя Cirrus Logic.
pub(super) const VENDOR_CIRRUS: u16 = 0x1013;

/// Идентификатор производителя Realtek.
pub(super) const VENDOR_REALTEK: u16 = 0x10EC;

/// Идентификатор производителя паравиртуальных устройств Virtio.
pub(super) const VENDOR_VIRTIO: u16 = 0x1AF4;

/// Идентификатор производителя AMD.
pub(super) const VENDOR_AMD: u16 = 0x1022;

/// Смещение идентификатора производителя устройства
/// в пространстве конфигурации PCI--устройства.
const VENDOR_ID_ADDRESS: usize = 0x00;

/// Смещение регистра класса и ревизии
/// в пространстве конфигурации PCI--устройства.
pub(super) const CLASS_REVISION_ADDRESS: usize = 0x08;

/// Признак отсутствия устройства.
const NO_DEVICE: u16 = u16::MAX;
