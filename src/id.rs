use core::{
    fmt,
    mem,
};

/// Требования к числовому значению идентификатора
/// PCI устройств, производителей, классов и т.д.
pub trait IdValue: Clone + Copy + Default + fmt::Debug + fmt::UpperHex {}

impl<T: Clone + Copy + Default + fmt::Debug + fmt::UpperHex> IdValue for T {}

/// Единый тип для идентификаторов PCI устройств, производителей, классов и т.д.
///
/// Хранит числовое значение идентификатора и,
/// если оно нашлось в таблицах классификации, сопоставленное ему имя.
#[derive(Clone, Copy, Debug, Default)]
pub struct Id<T: IdValue> {
    /// Числовое значение идентификатора.
    id: T,

    /// Имя, сопоставленное идентификатору таблицами классификации.
    name: Option<&'static str>,
}

impl<T: IdValue> Id<T> {
    /// Создаёт идентификатор.
    pub(super) fn new(
        id: T,
        name: Option<&'static str>,
    ) -> Self {
        Self { id, name }
    }

    /// Возвращает числовое значение идентификатора.
    pub fn id(&self) -> T {
        self.id
    }

    /// Возвращает имя идентификатора,
    /// если оно есть в таблицах классификации.
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }
}

impl<T: IdValue> fmt::Display for Id<T> {
    fn fmt(
        &self,
        formatter: &mut fmt::Formatter,
    ) -> fmt::Result {
        if let Some(name) = self.name() {
            write!(formatter, "{name}")
        } else {
            write!(
                formatter,
                "0x{:0width$X}",
                self.id(),
                width = 2 * mem::size_of::<T>()
            )
        }
    }
}
