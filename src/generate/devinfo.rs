use std::fmt::Write;

use anyhow::Result;

use crate::util::{self, LICENSE_HEADER};

/// Structure definitions shared by every device header
const DEFINITIONS: &str = r#"

#include "api/types.h"
#include "api/syscall.h"


/*
** This file defines the valid adress ranges where devices are mapped.
** This allows the kernel to check that device registration requests correct
** mapping.
**
** Of course these informations are SoC specific
** This file may be completed by a bord specific file for board devices
*/

/*!
** \brief Structure defining the STM32 device map
**
** This table is based on doc STMicro RM0090 Reference manual memory map
** Only devices that may be registered by userspace are mapped here
**
** See #soc_devices_list
*/

struct user_driver_device_gpio_infos {
    uint8_t    port;
    uint8_t    pin;
};

struct user_driver_device_infos {
    physaddr_t addr;       /**< Device MMIO base address */
    uint32_t   size;       /**< Device MMIO mapping size */
    uint8_t    irq[4];     /**< IRQ line, when exist, or 0, max 4 irq lines per device */
    /** GPIO informations of the device (pin, port) */
    struct user_driver_device_gpio_infos gpios[4];
};


"#;

/// Generates `devinfo.h`
pub fn render() -> Result<String> {
    let guard = util::include_guard("devinfo");
    let mut out = String::from(LICENSE_HEADER);
    writeln!(out, "#ifndef {guard}")?;
    writeln!(out, "# define {guard}")?;
    out.push_str(DEFINITIONS);
    writeln!(out, "#endif/*!{guard}*/")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guards_the_definitions() {
        let header = render().unwrap();
        let body = header.strip_prefix(LICENSE_HEADER).unwrap();
        assert!(body.starts_with("#ifndef DEVINFO_H_\n# define DEVINFO_H_\n\n\n#include \"api/types.h\"\n"));
        assert!(body.ends_with("};\n\n\n#endif/*!DEVINFO_H_*/\n"));
    }

    #[test]
    fn declares_both_records() {
        let header = render().unwrap();
        assert!(header.contains(
            "struct user_driver_device_gpio_infos {\n    uint8_t    port;\n    uint8_t    pin;\n};"
        ));
        assert!(header.contains("struct user_driver_device_infos {\n    physaddr_t addr;"));
        assert!(header.contains("    uint8_t    irq[4];"));
        assert!(header.contains("    struct user_driver_device_gpio_infos gpios[4];\n};"));
    }
}
