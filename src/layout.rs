//! Device layout loading
//!
//! A layout is a JSON object mapping device names to descriptors:
//!
//! ```json
//! {
//!   "usart1": {
//!     "address": "0x40011000",
//!     "size": "0x400",
//!     "irqs": ["USART1_IRQ", 0, 0, 0],
//!     "irqs_literal": [37, 0, 0, 0],
//!     "gpios": [{ "port": 1, "pin": 9 }, { "port": 1, "pin": 10 }]
//!   }
//! }
//! ```
//!
//! Devices keep the order of the document. Every entry is checked up front
//! and all problems are reported together.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Maximum number of IRQ lines of a device
pub const MAX_IRQS: usize = 4;
/// Maximum number of GPIO pairs of a device
pub const MAX_GPIOS: usize = 4;

/// `size` value of devices that userspace cannot map
const UNMAPPABLE_SIZE: &str = "0";

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("couldn't read the layout file `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("the layout is not valid JSON")]
    Parse(#[from] serde_json::Error),
    #[error("the layout must be a JSON object mapping device names to descriptors")]
    NotAnObject,
    #[error("{}", list_problems(.0))]
    InvalidDevices(Vec<DeviceError>),
}

fn list_problems(problems: &[DeviceError]) -> String {
    let mut out = format!("{} problem(s) in the layout:", problems.len());
    for p in problems {
        out.push_str("\n  - ");
        out.push_str(&p.to_string());
    }
    out
}

/// A problem found in one device entry
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("device `{device}`: missing field `{field}`")]
    MissingField { device: String, field: String },
    #[error("device `{device}`: {message}")]
    Malformed { device: String, message: String },
}

/// Value copied verbatim into the generated C code
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Str(String),
    Num(Number),
}

impl Token {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Number(n) => Some(Self::Num(n.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Num(n) => fmt::Display::fmt(n, f),
        }
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<u64> for Token {
    fn from(n: u64) -> Self {
        Self::Num(n.into())
    }
}

/// One IRQ slot of a device
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Irq {
    /// No interrupt line in this slot
    None,
    /// Interrupt line exported as the `name` macro
    Named { name: String, value: i64 },
}

impl fmt::Display for Irq {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::None => f.write_str("0"),
            Self::Named { name, .. } => f.write_str(name),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Gpio {
    pub port: Token,
    pub pin: Token,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeviceDescriptor {
    /// MMIO base address
    pub address: Token,
    /// MMIO mapping size, `"0"` for devices userspace can't map
    pub size: Token,
    pub irqs: Vec<Irq>,
    pub gpios: Vec<Gpio>,
}

impl DeviceDescriptor {
    /// Whether the device gets a header at all
    pub fn is_mappable(&self) -> bool {
        !matches!(&self.size, Token::Str(s) if s == UNMAPPABLE_SIZE)
    }

    /// Named IRQ slots with their line numbers, in slot order
    pub fn irq_macros(&self) -> impl Iterator<Item = (&str, i64)> {
        self.irqs.iter().filter_map(|irq| match irq {
            Irq::None => None,
            Irq::Named { name, value } => Some((name.as_str(), *value)),
        })
    }
}

/// Devices of a SoC, in document order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceLayout {
    devices: Vec<(String, DeviceDescriptor)>,
}

impl DeviceLayout {
    pub fn from_path(path: &Path) -> Result<Self, LayoutError> {
        let json = std::fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(map) => Self::from_map(&map),
            _ => Err(LayoutError::NotAnObject),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self, LayoutError> {
        let mut problems = Vec::new();
        let mut devices = Vec::with_capacity(map.len());
        for (name, entry) in map {
            let mut checker = Checker {
                device: name,
                problems: &mut problems,
            };
            if let Some(descriptor) = checker.descriptor(entry) {
                devices.push((name.clone(), descriptor));
            }
        }
        if problems.is_empty() {
            Ok(Self { devices })
        } else {
            Err(LayoutError::InvalidDevices(problems))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeviceDescriptor)> {
        self.devices.iter().map(|(name, dev)| (name.as_str(), dev))
    }

    pub fn get(&self, name: &str) -> Option<&DeviceDescriptor> {
        self.iter().find(|(n, _)| *n == name).map(|(_, dev)| dev)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

/// Collects the problems of one device entry
struct Checker<'a> {
    device: &'a str,
    problems: &'a mut Vec<DeviceError>,
}

impl Checker<'_> {
    fn missing(&mut self, field: impl Into<String>) {
        self.problems.push(DeviceError::MissingField {
            device: self.device.to_string(),
            field: field.into(),
        });
    }

    fn malformed(&mut self, message: impl Into<String>) {
        self.problems.push(DeviceError::Malformed {
            device: self.device.to_string(),
            message: message.into(),
        });
    }

    fn descriptor(&mut self, entry: &Value) -> Option<DeviceDescriptor> {
        let Some(entry) = entry.as_object() else {
            self.malformed("entry is not an object");
            return None;
        };
        let before = self.problems.len();

        let address = self.token(entry, "address", "address");
        let size = self.token(entry, "size", "size");
        let irqs = self.irqs(entry);
        let gpios = self.gpios(entry);

        if self.problems.len() != before {
            return None;
        }
        Some(DeviceDescriptor {
            address: address?,
            size: size?,
            irqs: irqs?,
            gpios: gpios?,
        })
    }

    fn token(&mut self, obj: &Map<String, Value>, key: &str, field: &str) -> Option<Token> {
        let Some(value) = obj.get(key) else {
            self.missing(field);
            return None;
        };
        let token = Token::from_value(value);
        if token.is_none() {
            self.malformed(format!("`{field}` must be a string or a number, found {value}"));
        }
        token
    }

    fn irqs(&mut self, entry: &Map<String, Value>) -> Option<Vec<Irq>> {
        let Some(irqs) = entry.get("irqs") else {
            self.missing("irqs");
            return None;
        };
        let Some(irqs) = irqs.as_array() else {
            self.malformed("`irqs` must be an array");
            return None;
        };
        if irqs.is_empty() || irqs.len() > MAX_IRQS {
            self.malformed(format!(
                "`irqs` must have between 1 and {MAX_IRQS} entries, found {}",
                irqs.len()
            ));
            return None;
        }
        let literals = entry.get("irqs_literal").and_then(Value::as_array);

        let mut out = Vec::with_capacity(irqs.len());
        let mut ok = true;
        for (i, irq) in irqs.iter().enumerate() {
            match irq {
                Value::Number(n) if n.as_u64() == Some(0) => out.push(Irq::None),
                Value::String(name) => {
                    let value = literals.and_then(|l| l.get(i)).and_then(Value::as_i64);
                    match value {
                        Some(value) => out.push(Irq::Named {
                            name: name.clone(),
                            value,
                        }),
                        None if literals.is_none() => {
                            self.missing(format!("irqs_literal[{i}]"));
                            ok = false;
                        }
                        None => {
                            self.malformed(format!(
                                "`irqs_literal[{i}]` must be the integer line of `{name}`"
                            ));
                            ok = false;
                        }
                    }
                }
                other => {
                    self.malformed(format!(
                        "`irqs[{i}]` must be 0 or an IRQ macro name, found {other}"
                    ));
                    ok = false;
                }
            }
        }
        ok.then_some(out)
    }

    fn gpios(&mut self, entry: &Map<String, Value>) -> Option<Vec<Gpio>> {
        let Some(gpios) = entry.get("gpios") else {
            return Some(Vec::new());
        };
        let Some(gpios) = gpios.as_array() else {
            self.malformed("`gpios` must be an array");
            return None;
        };
        if gpios.len() > MAX_GPIOS {
            self.malformed(format!(
                "`gpios` has at most {MAX_GPIOS} entries, found {}",
                gpios.len()
            ));
            return None;
        }
        let mut out = Vec::with_capacity(gpios.len());
        let mut ok = true;
        for (i, gpio) in gpios.iter().enumerate() {
            let Some(gpio) = gpio.as_object() else {
                self.malformed(format!("`gpios[{i}]` must be an object"));
                ok = false;
                continue;
            };
            let port = self.token(gpio, "port", &format!("gpios[{i}].port"));
            let pin = self.token(gpio, "pin", &format!("gpios[{i}].pin"));
            match (port, pin) {
                (Some(port), Some(pin)) => out.push(Gpio { port, pin }),
                _ => ok = false,
            }
        }
        ok.then_some(out)
    }
}
