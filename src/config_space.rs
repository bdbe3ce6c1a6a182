use super::RoutingId;

/// Типаж для работы с
/// [пространством конфигурации PCI](https://en.wikipedia.org/wiki/PCI_configuration_space).
///
/// Сама транспортировка обращений ---
/// через порты `0x0CF8`/`0x0CFC` или через отображение в память ---
/// остаётся за реализацией типажа.
pub trait ConfigSpace {
    /// Читает 32-битную величину по смещению `offset`
    /// в пространстве конфигурации устройства, адресуемого `routing_id`.
    ///
    /// # Safety
    ///
    /// Определяется спецификацией шины и устройств PCI.
    unsafe fn read(
        &mut self,
        routing_id: RoutingId,
        offset: usize,
    ) -> u32;

    /// Записывает 32-битную величину по смещению `offset`
    /// в пространстве конфигурации устройства, адресуемого `routing_id`.
    ///
    /// # Safety
    ///
    /// Определяется спецификацией шины и устройств PCI.
    unsafe fn write(
        &mut self,
        routing_id: RoutingId,
        offset: usize,
        data: u32,
    );

    /// Запрашивает у устройства маску декодируемых битов его BAR--регистра
    /// по смещению `offset`:
    /// записывает в регистр шаблон из одних единиц и читает его обратно.
    ///
    /// Запись временно затирает содержимое регистра.
    /// По спецификации PCI устройство само восстанавливает декодирование
    /// адресов при следующем обращении,
    /// поэтому явная запись старого значения не нужна.
    /// Но последовательность чтение--запись--чтение над одним регистром
    /// должна выполняться строго по шагам и
    /// не должна перемежаться другими обращениями к этому устройству.
    ///
    /// # Safety
    ///
    /// Определяется спецификацией шины и устройств PCI.
    unsafe fn probe_size_mask(
        &mut self,
        routing_id: RoutingId,
        offset: usize,
    ) -> u32 {
        unsafe { self.write(routing_id, offset, PROBE_PATTERN) };
        unsafe { self.read(routing_id, offset) }
    }
}

/// Шаблон из одних единиц,
/// записываемый в BAR--регистр при определении размера ресурса.
const PROBE_PATTERN: u32 = 0xFFFF_FFFF;
