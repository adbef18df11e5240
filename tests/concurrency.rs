//! Mode changes racing each other and channel reads on a shared LTC2990.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Mutex, OnceLock};
use std::time::Duration;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
use ltc2990::{Address, Attribute, Channel, ChannelSet, Ltc2990, Mode, Publish};

/// Register file of a simulated LTC2990. Every byte write is recorded.
struct SimulatedDevice {
    registers: [u8; 16],
    pointer: usize,
    writes: Vec<(u8, u8)>,
}

impl SimulatedDevice {
    fn new() -> Self {
        let mut registers = [0; 16];

        // T_INT = 25 degrees, V_CC = 5V.
        registers[0x04..0x06].copy_from_slice(&0x0190u16.to_be_bytes());
        registers[0x0E..0x10].copy_from_slice(&0x2000u16.to_be_bytes());

        Self {
            registers,
            pointer: 0,
            writes: Vec::new(),
        }
    }
}

impl ErrorType for SimulatedDevice {
    type Error = ErrorKind;
}

impl I2c for SimulatedDevice {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        assert_eq!(address, 0x4C);

        for operation in operations {
            match operation {
                Operation::Write(data) => {
                    self.pointer = data[0] as usize;
                    if data.len() == 2 {
                        self.registers[self.pointer] = data[1];
                        self.writes.push((data[0], data[1]));
                    }
                }
                Operation::Read(buffer) => {
                    for (offset, byte) in buffer.iter_mut().enumerate() {
                        *byte = self.registers[self.pointer + offset];
                    }
                }
            }
        }

        Ok(())
    }
}

#[derive(Default)]
struct Visibility {
    published: Mutex<Vec<ChannelSet>>,
}

impl Publish for &Visibility {
    type Error = ();

    fn publish(&mut self, enabled: ChannelSet) -> Result<(), ()> {
        self.published.lock().unwrap().push(enabled);
        Ok(())
    }
}

#[test]
fn concurrent_mode_changes_are_serialized() {
    for _ in 0..50 {
        let visibility = Visibility::default();
        let device =
            Ltc2990::with_publisher(SimulatedDevice::new(), Address::Adr00, None, &visibility)
                .unwrap();

        std::thread::scope(|scope| {
            scope.spawn(|| device.set_mode(3).unwrap());
            scope.spawn(|| device.set_mode(5).unwrap());
            scope.spawn(|| {
                for _ in 0..10 {
                    assert_eq!(device.read_channel(Channel::Temp1), Ok(25000));
                    assert_eq!(device.read_channel(Channel::In0), Ok(5000));
                }
            });
        });

        let mode = device.mode();
        assert!(mode.value() == 3 || mode.value() == 5);

        let published = visibility.published.lock().unwrap().clone();
        assert_eq!(published.len(), 3);
        assert_eq!(published.last(), Some(&mode.enabled_channels()));

        let (bus, _) = device.release();

        // Every control write is immediately followed by its trigger.
        assert_eq!(bus.writes.len(), 6);
        for pair in bus.writes.chunks(2) {
            assert_eq!(pair[0].0, 0x01);
            assert_eq!(pair[1], (0x02, 0x01));
        }

        let requested: Vec<u8> = bus.writes[2..].iter().step_by(2).map(|w| w.1).collect();
        assert!(requested == [0x1B, 0x1D] || requested == [0x1D, 0x1B]);
        assert_eq!(bus.registers[0x01], 0x18 | mode.value());
    }
}

#[test]
fn rejected_mode_change_does_not_disturb_device() {
    let visibility = Visibility::default();
    let device =
        Ltc2990::with_publisher(SimulatedDevice::new(), Address::Adr00, Some(1), &visibility)
            .unwrap();

    std::thread::scope(|scope| {
        scope.spawn(|| assert!(device.set_mode(8).is_err()));
        scope.spawn(|| device.set_mode(2).unwrap());
    });

    assert_eq!(device.mode().value(), 2);

    let published = visibility.published.lock().unwrap().clone();
    assert_eq!(
        published,
        [
            Mode::new(1).unwrap().enabled_channels(),
            Mode::new(2).unwrap().enabled_channels()
        ]
    );

    let (bus, _) = device.release();
    assert_eq!(bus.writes, [(0x01, 0x19), (0x02, 0x01), (0x01, 0x1A), (0x02, 0x01)]);
}

/// Holds the republish of a mode change open until the test releases it.
struct Gate {
    armed: AtomicBool,
    entered: Mutex<mpsc::Sender<()>>,
    released: Mutex<mpsc::Receiver<()>>,
    released_in_time: AtomicBool,
}

impl Publish for &Gate {
    type Error = ();

    fn publish(&mut self, _enabled: ChannelSet) -> Result<(), ()> {
        if self.armed.load(Ordering::SeqCst) {
            self.entered.lock().unwrap().send(()).unwrap();
            let released = self
                .released
                .lock()
                .unwrap()
                .recv_timeout(Duration::from_secs(5))
                .is_ok();
            self.released_in_time.store(released, Ordering::SeqCst);
        }

        Ok(())
    }
}

#[test]
fn reads_proceed_during_republish() {
    let (entered, wait_entered) = mpsc::channel();
    let (release, released) = mpsc::channel();
    let gate = Gate {
        armed: AtomicBool::new(false),
        entered: Mutex::new(entered),
        released: Mutex::new(released),
        released_in_time: AtomicBool::new(false),
    };

    let device =
        Ltc2990::with_publisher(SimulatedDevice::new(), Address::Adr00, None, &gate).unwrap();
    gate.armed.store(true, Ordering::SeqCst);

    std::thread::scope(|scope| {
        scope.spawn(|| device.set_mode(3).unwrap());

        wait_entered.recv().unwrap();

        // The mode change is committed while its publication is still pending.
        assert_eq!(device.mode().value(), 3);
        assert!(device.is_visible(Channel::Temp2));
        assert_eq!(device.read_channel(Channel::Temp1), Ok(25000));
        assert_eq!(device.read_channel(Channel::In0), Ok(5000));

        release.send(()).unwrap();
    });

    assert!(gate.released_in_time.load(Ordering::SeqCst));

    let (bus, _) = device.release();
    assert_eq!(bus.writes[2..], [(0x01, 0x1B), (0x02, 0x01)]);
}

/// Queries the driver it is attached to whenever visibility is republished.
struct Observer;

static OBSERVED: Mutex<Vec<(u8, bool, usize)>> = Mutex::new(Vec::new());
static OBSERVED_DEVICE: OnceLock<Ltc2990<SimulatedDevice, Observer>> = OnceLock::new();

impl Publish for Observer {
    type Error = ();

    fn publish(&mut self, enabled: ChannelSet) -> Result<(), ()> {
        // Nothing to observe while the driver is being constructed.
        if let Some(device) = OBSERVED_DEVICE.get() {
            assert_eq!(device.enabled_channels(), enabled);
            OBSERVED.lock().unwrap().push((
                device.mode().value(),
                device.is_visible(Channel::Temp3),
                device.visible_attributes().count(),
            ));
        }

        Ok(())
    }
}

#[test]
fn publisher_queries_visibility() {
    let device = OBSERVED_DEVICE.get_or_init(|| {
        Ltc2990::with_publisher(SimulatedDevice::new(), Address::Adr00, None, Observer).unwrap()
    });

    device.set_mode(3).unwrap();
    device.set_mode(5).unwrap();
    assert_eq!(device.show(Attribute::Mode).unwrap().as_str(), "5\n");

    // temp1, in0 and mode are always visible in addition to the channels of the mode.
    let observed = OBSERVED.lock().unwrap().clone();
    assert_eq!(observed, [(3, false, 6), (5, true, 5)]);
}
