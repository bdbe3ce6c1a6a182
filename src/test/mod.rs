use alloc::format;

use tracing::debug;
use tracing_core::LevelFilter;
use tracing_subscriber::{
    self,
    EnvFilter,
    fmt,
};

use crate::{
    bar,
    class::subclass_name,
};


#[test]
fn device_id() {
    for mut device in devices::all() {
        debug!(device = device.name());
        device.validate_device_id();
    }
}

#[test]
fn class() {
    for mut device in devices::all() {
        debug!(device = device.name());
        device.validate_class();
    }
}

#[test]
fn resources() {
    for mut device in devices::with_resources() {
        debug!(device = device.name());
        device.validate_resources();
    }
}

#[test]
fn dispatch() {
    for mut device in devices::all() {
        debug!(device = device.name());
        device.validate_dispatch();
    }
}

#[test]
fn sizing() {
    assert_eq!(bar::decode_size(0, bar::MEMORY_ADDRESS_MASK), 0);
    assert_eq!(bar::decode_size(0xFFFF_FFFF, 0), 0);

    assert_eq!(bar::decode_size(0xFFFF_FFF0, bar::IO_ADDRESS_MASK & 0xFFFF), 0x10);
    assert_eq!(bar::decode_size(0xFFFF_E000, bar::IO_ADDRESS_MASK & 0xFFFF), 0x2000);
    assert_eq!(bar::decode_size(0xFFFF_FF00, bar::MEMORY_ADDRESS_MASK), 0x100);
    assert_eq!(bar::decode_size(0xFE00_0000, bar::MEMORY_ADDRESS_MASK), 0x200_0000);

    for shift in 4 .. 32 {
        let size_mask = u32::MAX << shift;
        let size = bar::decode_size(size_mask, bar::MEMORY_ADDRESS_MASK);

        assert_eq!(size, 1_u32 << shift);
        assert!(size.is_power_of_two());
    }

    for size_mask in [0x0000_0001, 0x1234_5678, 0xFFFF_F001, 0x8000_0000_u32] {
        for address_mask in [bar::IO_ADDRESS_MASK & 0xFFFF, bar::MEMORY_ADDRESS_MASK] {
            let significant = size_mask & address_mask;
            let size = bar::decode_size(size_mask, address_mask);

            if significant == 0 {
                assert_eq!(size, 0);
            } else {
                assert!(size.is_power_of_two());
                assert_eq!(size.trailing_zeros(), significant.trailing_zeros());
            }
        }
    }
}

#[test]
fn subclass_clamp() {
    use crate::ClassCode;

    for subclass in 0 ..= u8::MAX {
        let bridge = subclass_name(Some(ClassCode::Bridge), subclass).unwrap();
        match subclass {
            0 => assert_eq!(bridge, "Host"),
            1 => assert_eq!(bridge, "ISA"),
            _ => assert_eq!(bridge, "Other"),
        }

        let network = subclass_name(Some(ClassCode::Network), subclass).unwrap();
        match subclass {
            0 => assert_eq!(network, "Ethernet"),
            _ => assert_eq!(network, "Other"),
        }

        assert!(subclass_name(Some(ClassCode::Display), subclass).is_none());
        assert!(subclass_name(None, subclass).is_none());
    }
}

#[test]
fn io_base() {
    let mut virtio = devices::virtio_nic();
    let nic = virtio.nic();

    assert_eq!(nic.io_base(), 0x1000);
    assert_eq!(nic.device().io_base(), 0x1000);
}

#[test]
#[should_panic(expected = "no I/O resource")]
fn io_base_without_io_resource() {
    let device = devices::cirrus_display().device();

    device.io_base();
}

#[test]
fn unsupported_vendor() {
    let mut realtek = devices::realtek_nic();
    let error = realtek.dispatch_error();

    assert_eq!(error.vendor().name(), Some("Realtek Semi.Corp."));
    assert!(format!("{error}").contains("only Virtio is supported"));

    assert_eq!(realtek.bar_writes(), 0);
}

#[ctor::ctor]
fn init() {
    let filter = EnvFilter::from_default_env().add_directive(LevelFilter::DEBUG.into());

    let format = fmt::format()
        .with_level(true)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(true)
        .compact();

    tracing_subscriber::fmt()
        .with_ansi(false)
        .event_format(format)
        .with_env_filter(filter)
        .init();
}
