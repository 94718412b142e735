//! Dotted-quad IPv4 to integer conversion
//!
//! Range tables compare addresses numerically. Two flavors exist:
//! - [`ipv4_to_u32`] for untrusted input (measurement rows, CLI arguments)
//! - [`ipv4_const`] for literals baked into the static tables

/// Parse a dotted-quad IPv4 string into its big-endian `u32` form
///
/// Returns `None` for anything that is not exactly four decimal octets in
/// `0..=255` separated by `.`. Callers treat `None` as "no numeric range
/// can match" rather than as an error.
///
/// # Examples
///
/// ```
/// use bestip_core::ip::ipv4_to_u32;
///
/// assert_eq!(ipv4_to_u32("104.16.0.1"), Some(0x6810_0001));
/// assert_eq!(ipv4_to_u32("2606:4700::1"), None);
/// ```
pub fn ipv4_to_u32(ip: &str) -> Option<u32> {
    let mut octets = ip.split('.');
    let mut value = 0u32;

    for _ in 0..4 {
        let octet: u8 = octets.next()?.parse().ok()?;
        value = (value << 8) | u32::from(octet);
    }

    if octets.next().is_some() {
        return None;
    }

    Some(value)
}

/// Compile-time twin of [`ipv4_to_u32`]
///
/// Panics on malformed input, which turns a typo in a `const` table into a
/// build failure.
pub const fn ipv4_const(ip: &str) -> u32 {
    let bytes = ip.as_bytes();
    let mut value: u32 = 0;
    let mut octet: u32 = 0;
    let mut digits = 0;
    let mut dots = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'.' {
            if digits == 0 {
                panic!("empty octet in IPv4 literal");
            }
            value = (value << 8) | octet;
            octet = 0;
            digits = 0;
            dots += 1;
        } else if b.is_ascii_digit() {
            octet = octet * 10 + (b - b'0') as u32;
            digits += 1;
            if octet > 255 {
                panic!("octet out of range in IPv4 literal");
            }
        } else {
            panic!("invalid character in IPv4 literal");
        }
        i += 1;
    }

    if dots != 3 || digits == 0 {
        panic!("IPv4 literal must have four octets");
    }

    (value << 8) | octet
}

/// True when the address should be handled as IPv6
///
/// Mirrors the data feed convention: anything with a colon is IPv6.
pub fn is_ipv6(ip: &str) -> bool {
    ip.contains(':')
}
