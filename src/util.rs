/// License and attribution block written at the top of every generated header
pub const LICENSE_HEADER: &str = r#"/*
 *
 * Copyright 2018 The wookey project team <wookey@ssi.gouv.fr>
 *   - Ryad     Benadjila
 *   - Arnauld  Michelizza
 *   - Mathieu  Renard
 *   - Philippe Thierry
 *   - Philippe Trebuchet
 *
 * This package is free software; you can redistribute it and/or modify
 * it under the terms of the GNU Lesser General Public License as published
 * the Free Software Foundation; either version 2.1 of the License, or (at
 * ur option) any later version.
 *
 * This package is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Lesser General Public License for more details.
 *
 * You should have received a copy of the GNU Lesser General Public License along
 * with this package; if not, write to the Free Software Foundation, Inc., 51
 * Franklin St, Fifth Floor, Boston, MA 02110-1301 USA
 *
 * This file has been generated by devheader from a Tataouine SDK Json layout file
 *
 */
"#;

/// Name of the shared structure-definition header
pub const DEVINFO_FILE: &str = "devinfo.h";

/// Path under which device headers include the shared header
pub const DEVINFO_INCLUDE: &str = "generated/devinfo.h";

/// Header file name of a device
pub fn header_file_name(device: &str) -> String {
    format!("{device}.h")
}

/// Include guard macro for a header stem, e.g. `usart1` -> `USART1_H_`
///
/// The stem is uppercased as is. Characters that are not valid in a C
/// identifier (like the `-` of `usb-otg-fs`) are kept.
pub fn include_guard(stem: &str) -> String {
    format!("{}_H_", stem.to_uppercase())
}

/// Name of the descriptor record declared in a device header
pub fn dev_infos_ident(device: &str) -> String {
    format!("{device}_dev_infos")
}
