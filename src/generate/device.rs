use std::fmt::Write;

use anyhow::Result;

use crate::layout::{DeviceDescriptor, MAX_GPIOS};
use crate::util::{self, DEVINFO_INCLUDE, LICENSE_HEADER};

/// Generates the `<device>.h` header declaring `<device>_dev_infos`
///
/// The `.irqs[]` and `.gpios[]` designators are not standard C. They are
/// what the consuming toolchain expects and are written as is.
pub fn render(name: &str, dev: &DeviceDescriptor) -> Result<String> {
    let guard = util::include_guard(name);
    let mut out = String::from(LICENSE_HEADER);
    writeln!(out, "#ifndef {guard}")?;
    writeln!(out, "# define {guard}")?;
    writeln!(out)?;
    writeln!(out, "#include \"{DEVINFO_INCLUDE}\"")?;
    writeln!(out)?;

    for (irq, value) in dev.irq_macros() {
        writeln!(out, "#define {irq} {value}")?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "static const struct user_driver_device_infos {} = {{",
        util::dev_infos_ident(name)
    )?;
    writeln!(out, "    .address = {},", dev.address)?;
    writeln!(out, "    .size    = {},", dev.size)?;

    let irqs = dev
        .irqs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(out, "    .irqs[] = {{     {irqs} }},")?;

    writeln!(out, "    .gpios[] = {{")?;
    for gpio in &dev.gpios {
        writeln!(out, "      {{ {}, {} }},", gpio.port, gpio.pin)?;
    }
    for _ in dev.gpios.len()..MAX_GPIOS {
        writeln!(out, "      {{ 0, 0 }},")?;
    }
    writeln!(out, "    }}")?;
    writeln!(out, "}};")?;

    writeln!(out)?;
    writeln!(out)?;
    writeln!(out, "#endif")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::DeviceLayout;

    fn render_one(json: &str) -> String {
        let layout = DeviceLayout::from_json(json).unwrap();
        let (name, dev) = layout.iter().next().unwrap();
        let header = render(name, dev).unwrap();
        header.strip_prefix(LICENSE_HEADER).unwrap().to_string()
    }

    #[test]
    fn usart1_header() {
        let body = render_one(
            r#"{ "usart1": {
                "address": "0x40011000",
                "size": "0x400",
                "irqs": ["USART1_IRQ", 0, 0, 0],
                "irqs_literal": [37, 0, 0, 0],
                "gpios": [{ "port": 1, "pin": 9 }, { "port": 1, "pin": 10 }]
            } }"#,
        );
        assert_eq!(
            body,
            "#ifndef USART1_H_
# define USART1_H_

#include \"generated/devinfo.h\"

#define USART1_IRQ 37

static const struct user_driver_device_infos usart1_dev_infos = {
    .address = 0x40011000,
    .size    = 0x400,
    .irqs[] = {     USART1_IRQ, 0, 0, 0 },
    .gpios[] = {
      { 1, 9 },
      { 1, 10 },
      { 0, 0 },
      { 0, 0 },
    }
};


#endif
"
        );
    }

    #[test]
    fn defines_only_named_irqs() {
        let body = render_one(
            r#"{ "uart1": {
                "address": "0x40011000",
                "size": "0x400",
                "irqs": ["UART1_IRQ", 0, "UART1_ERR_IRQ", 0],
                "irqs_literal": [37, 0, 38, 0]
            } }"#,
        );
        let defines: Vec<_> = body.lines().filter(|l| l.starts_with("#define")).collect();
        assert_eq!(defines, ["#define UART1_IRQ 37", "#define UART1_ERR_IRQ 38"]);
        assert!(body.contains("    .irqs[] = {     UART1_IRQ, 0, UART1_ERR_IRQ, 0 },\n"));
    }

    #[test]
    fn pads_gpios_to_four() {
        let body = render_one(
            r#"{ "i2c1": {
                "address": "0x40005400",
                "size": "0x400",
                "irqs": [0],
                "gpios": [{ "port": 2, "pin": 5 }]
            } }"#,
        );
        assert!(body.contains(
            "    .gpios[] = {\n      { 2, 5 },\n      { 0, 0 },\n      { 0, 0 },\n      { 0, 0 },\n    }\n"
        ));
    }

    #[test]
    fn missing_gpios_are_four_zero_pairs() {
        let body = render_one(
            r#"{ "crc": { "address": "0x40023000", "size": "0x400", "irqs": [0, 0, 0, 0] } }"#,
        );
        assert_eq!(body.matches("      { 0, 0 },\n").count(), 4);
        assert!(!body.contains("#define"));
    }

    #[test]
    fn irq_list_is_not_padded() {
        let body = render_one(
            r#"{ "rng": { "address": "0x50060800", "size": "0x400",
                 "irqs": ["RNG_IRQ"], "irqs_literal": [80] } }"#,
        );
        assert!(body.contains("    .irqs[] = {     RNG_IRQ },\n"));
    }

    #[test]
    fn tokens_are_verbatim() {
        let body = render_one(
            r#"{ "usb-otg-fs": { "address": "USB_OTG_FS_BASE", "size": 16384, "irqs": [0],
                 "gpios": [{ "port": "GPIO_PA", "pin": 11 }] } }"#,
        );
        assert!(body.starts_with("#ifndef USB-OTG-FS_H_\n"));
        assert!(body.contains("usb-otg-fs_dev_infos = {\n"));
        assert!(body.contains("    .address = USB_OTG_FS_BASE,\n    .size    = 16384,\n"));
        assert!(body.contains("      { GPIO_PA, 11 },\n"));
    }
}
