//! Device information header generator for userspace drivers
//!
//! A layout file is a JSON object describing the memory-mapped devices of a
//! SoC: where each device is mapped, how large its MMIO window is, which IRQ
//! lines it raises and which GPIO pins its alternate functions occupy.
//!
//! `devheader` turns such a layout into C headers. Userspace drivers include
//! them to fill their device registration requests, and the kernel uses the
//! same values to check that a registration asks for a correct mapping.
//!
//! # Usage
//!
//! ```text
//! $ devheader build/generated layout/stm32f439.json
//! ```
//!
//! The output directory receives:
//!
//! - `devinfo.h`, defining `struct user_driver_device_gpio_infos` and
//!   `struct user_driver_device_infos`,
//! - one `<device>.h` per device whose `size` is not `"0"`.
//!
//! Devices with a `size` of `"0"` (DMA controllers for instance) can't be
//! mapped by userspace and get no header.
//!
//! # Device header
//!
//! ```c
//! #ifndef USART1_H_
//! # define USART1_H_
//!
//! #include "generated/devinfo.h"
//!
//! #define USART1_IRQ 37
//!
//! static const struct user_driver_device_infos usart1_dev_infos = {
//!     .address = 0x40011000,
//!     .size    = 0x400,
//!     .irqs[] = {     USART1_IRQ, 0, 0, 0 },
//!     .gpios[] = {
//!       { 1, 9 },
//!       { 1, 10 },
//!       { 0, 0 },
//!       { 0, 0 },
//!     }
//! };
//!
//!
//! #endif
//! ```
//!
//! Every named IRQ slot becomes a `#define` of its line number, taken from
//! `irqs_literal`. GPIO lists are padded with `{ 0, 0 }` up to four pairs.
//!
//! # Library use
//!
//! ```no_run
//! let config = devheader::Config::new("build/generated", "layout/stm32f439.json");
//! for path in devheader::generate(&config)? {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod generate;
pub mod layout;
pub mod util;

pub use crate::config::Config;
pub use crate::generate::{generate, render_layout};
pub use crate::layout::{DeviceDescriptor, DeviceLayout, LayoutError};
