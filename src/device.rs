use core::{
    error,
    mem,
};

use alloc::vec::Vec;

use bitflags::bitflags;
use derive_getters::Getters;
use derive_more::Display;
use tracing::{
    debug,
    info,
};

use super::{
    Class,
    ClassCode,
    ConfigSpace,
    DeviceId,
    Id,
    Nic,
    Resource,
    RoutingId,
    bar::{
        BARS_END_ADDRESS,
        BARS_START_ADDRESS,
    },
    device_id::{
        VENDOR_VIRTIO,
        vendor_device,
    },
};

/// Состояние жизненного цикла PCI--устройства.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum State {
    /// Класс и идентификаторы декодированы, ресурсы не привязаны.
    #[display("identified")]
    Identified,

    /// BAR--регистры просканированы,
    /// устройство владеет объявленными ими ресурсами.
    #[display("resources bound")]
    ResourcesBound,
}

/// Структура, описывающая PCI--устройство.
#[derive(Clone, Debug, Display, Getters)]
#[display("{} {{ {}, {}, {} }}", routing_id, class, id, state)]
pub struct Device {
    /// Класс PCI--устройства.
    class: Class,

    /// Регистр команд и статуса PCI--устройства.
    command_and_status: CommandAndStatusRegister,

    /// Идентификатор PCI--устройства.
    id: DeviceId,

    /// Назначенное устройству прерывание, если оно задано.
    interrupt: Option<Interrupt>,

    /// Ресурсы портов ввода--вывода, объявленные устройством,
    /// в порядке их BAR--регистров.
    /// Первый из них --- основной.
    io: Vec<Resource>,

    /// Ресурсы памяти, объявленные устройством,
    /// в порядке их BAR--регистров.
    /// Первый из них --- основной.
    memory: Vec<Resource>,

    /// Географические координаты PCI--устройства.
    routing_id: RoutingId,

    /// Состояние жизненного цикла PCI--устройства.
    state: State,

    /// Идентификатор подустройства.
    /// Например, конкретной платы, основанной на микросхеме,
    /// задаваемой основным идентификатором устройства.
    subdevice: Option<Id<u16>>,

    /// Идентификатор производителя подустройства.
    subvendor: Option<Id<u16>>,
}

impl Device {
    /// Читает описание PCI--устройства, адресуемого `routing_id`,
    /// из пространства конфигурации `config_space` и
    /// записывает его идентификацию в журнал.
    /// Если по адресу `routing_id` нет устройства, возвращает [`None`].
    ///
    /// Созданное описание находится в состоянии [`State::Identified`].
    pub fn new(
        config_space: &mut impl ConfigSpace,
        routing_id: RoutingId,
    ) -> Option<Self> {
        let id = DeviceId::new(config_space, routing_id)?;
        let class = Class::new(config_space, routing_id);

        let command_and_status_data =
            unsafe { config_space.read(routing_id, COMMAND_ADDRESS) };
        let command_and_status =
            CommandAndStatusRegister::from_bits_retain(command_and_status_data);

        let subvendor_subdevice_data =
            unsafe { config_space.read(routing_id, SUBSYSTEM_VENDOR_ID_ADDRESS) };
        let (subdevice, subvendor) = vendor_device(subvendor_subdevice_data)
            .map_or((None, None), |(subdevice, subvendor)| {
                (
                    (subdevice.id() != 0).then_some(subdevice),
                    (subvendor.id() != 0).then_some(subvendor),
                )
            });

        info!(%routing_id, %class, %id, "PCI device");

        Some(Self {
            class,
            command_and_status,
            id,
            interrupt: None,
            io: Vec::new(),
            memory: Vec::new(),
            routing_id,
            state: State::Identified,
            subdevice,
            subvendor,
        })
    }

    /// Выбирает по классу устройства путь его подключения.
    ///
    /// - Для сетевой карты проверяет производителя,
    ///   привязывает объявленные BAR--регистрами ресурсы ---
    ///   устройство переходит в состояние [`State::ResourcesBound`] ---
    ///   и создаёт драйвер [`Nic`],
    ///   который забирает устройство во владение: [`Attachment::Nic`].
    ///   Сетевые карты производителей, отличных от Virtio,
    ///   не поддерживаются --- для них возвращается ошибка
    ///   [`UnsupportedVendor`], а BAR--регистры не трогаются вовсе;
    ///   считать ли такую конфигурацию фатальной,
    ///   решает вызывающая сторона.
    /// - Мосты и устройства прочих классов ограничиваются идентификацией,
    ///   остаются в состоянии [`State::Identified`] и
    ///   возвращаются обратно: [`Attachment::Identified`].
    ///
    /// Регистрация результата в реестре устройств ---
    /// забота вызывающей стороны.
    pub fn dispatch(
        mut self,
        config_space: &mut impl ConfigSpace,
    ) -> Result<Attachment, UnsupportedVendor> {
        match Handler::for_class(self.class.code()) {
            Handler::Network => {
                let vendor = *self.id.vendor();
                if vendor.id() != VENDOR_VIRTIO {
                    return Err(UnsupportedVendor {
                        class: self.class,
                        vendor,
                    });
                }

                self.bind_resources(config_space);
                info!(product = %self.id.device(), "Virtio network controller");

                Ok(Attachment::Nic(Nic::new(self)))
            },

            Handler::Bridge | Handler::Unhandled => Ok(Attachment::Identified(self)),
        }
    }

    /// Сканирует BAR--регистры устройства,
    /// привязывает объявленные ими ресурсы и
    /// читает назначенное устройству прерывание.
    /// Переводит устройство в состояние [`State::ResourcesBound`].
    ///
    /// Каждый непустой BAR--регистр проходит строгую последовательность
    /// чтение --- запись шаблона из одних единиц --- чтение,
    /// которая не должна перемежаться другими обращениями к устройству,
    /// см. [`ConfigSpace::probe_size_mask`].
    pub(super) fn bind_resources(
        &mut self,
        config_space: &mut impl ConfigSpace,
    ) {
        for offset in (BARS_START_ADDRESS .. BARS_END_ADDRESS).step_by(mem::size_of::<u32>()) {
            if let Some(resource) = Resource::new(config_space, self.routing_id, offset) {
                if resource.is_io() {
                    self.io.push(resource);
                } else {
                    self.memory.push(resource);
                }
            }
        }

        self.state = State::ResourcesBound;

        debug!(
            io = self.io.len(),
            memory = self.memory.len(),
            "resources bound",
        );

        self.interrupt = Interrupt::new(config_space, self.routing_id);
        if let Some(interrupt) = self.interrupt {
            debug!(%interrupt);
        }
    }

    /// Возвращает начало основного ресурса портов ввода--вывода устройства.
    ///
    /// # Panics
    ///
    /// Устройство, работа которого построена на портах ввода--вывода,
    /// без такого ресурса функционировать не может,
    /// поэтому его отсутствие --- невосстановимая ошибка,
    /// вызывающая панику.
    pub fn io_base(&self) -> u32 {
        let Some(resource) = self.io.first() else {
            panic!("no I/O resource on PCI device {}", self.routing_id);
        };

        resource.start()
    }
}

/// Политика подключения, выбираемая по коду класса устройства.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Handler {
    /// Мосты: устройству достаточно идентификации.
    Bridge,

    /// Сетевые карты --- единственный класс,
    /// для которого привязываются ресурсы и создаётся драйвер.
    Network,

    /// Классы, для которых в этой реализации драйвера нет.
    Unhandled,
}

impl Handler {
    /// Возвращает политику подключения для кода класса `code`.
    fn for_class(code: Option<ClassCode>) -> Self {
        match code {
            Some(ClassCode::Bridge) => Self::Bridge,
            Some(ClassCode::Network) => Self::Network,
            _ => Self::Unhandled,
        }
    }
}

/// Результат диспетчеризации PCI--устройства по его классу.
#[derive(Debug)]
pub enum Attachment {
    /// Для устройства создан драйвер сетевой карты,
    /// устройство перешло во владение драйвера.
    Nic(Nic),

    /// Устройство ограничилось идентификацией,
    /// драйвера для него в этой реализации нет.
    Identified(Device),
}

/// Ошибка диспетчеризации: сетевая карта производителя,
/// для которого нет драйвера.
#[derive(Clone, Copy, Debug, Display, Getters)]
#[display("{} from unsupported vendor {}, only Virtio is supported", class, vendor)]
pub struct UnsupportedVendor {
    /// Класс устройства.
    class: Class,

    /// Производитель устройства.
    vendor: Id<u16>,
}

impl error::Error for UnsupportedVendor {}

/// Прерывание, назначенное PCI--устройству.
/// Маршрутизация прерывания --- забота внешнего кода.
#[derive(Clone, Copy, Debug, Display, Eq, Getters, PartialEq)]
#[display("IRQ {}, pin {}", line, pin)]
pub struct Interrupt {
    /// Номер линии прерывания.
    line: u8,

    /// Номер контакта прерывания, считая от `INTA#`.
    pin: u8,
}

impl Interrupt {
    /// Читает назначенное устройству прерывание из регистра прерываний.
    /// Возвращает [`None`],
    /// если номер линии не попадает в диапазон допустимых.
    fn new(
        config_space: &mut impl ConfigSpace,
        routing_id: RoutingId,
    ) -> Option<Self> {
        let interrupt_data = unsafe { config_space.read(routing_id, INTERRUPT_ADDRESS) };

        let line = (interrupt_data & 0xFF) as u8;
        let pin = ((interrupt_data >> 8) & 0xFF) as u8;

        (0 < line && line < MAX_INTERRUPT_LINE).then_some(Self { line, pin })
    }
}

bitflags! {
    /// Регистр команд и статуса PCI--устройства.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct CommandAndStatusRegister: u32 {
        /// Устройству разрешено отвечать на обращения
        /// к его портам ввода--вывода.
        const IO_SPACE = 1 << 0;

        /// Устройству разрешено отвечать на обращения к его памяти MMIO.
        const MEMORY_SPACE = 1 << 1;

        /// Устройству разрешено выступать хозяином шины.
        const BUS_MASTER = 1 << 2;

        /// Подача сигнала прерывания INTx# запрещена.
        const INTERRUPT_DISABLE = 1 << 10;

        /// Состояние сигнала прерывания INTx# устройства.
        const INTERRUPT_STATUS = 1 << 19;
    }
}

/// Смещение регистра команд и статуса
/// в пространстве конфигурации PCI--устройства.
const COMMAND_ADDRESS: usize = 0x04;

/// Смещение идентификаторов подустройства и его производителя
/// в пространстве конфигурации PCI--устройства.
const SUBSYSTEM_VENDOR_ID_ADDRESS: usize = 0x2C;

/// Смещение регистра прерываний
/// в пространстве конфигурации PCI--устройства.
const INTERRUPT_ADDRESS: usize = 0x3C;

/// Верхняя граница (не включительно) допустимых номеров линий прерываний.
const MAX_INTERRUPT_LINE: u8 = 32;
