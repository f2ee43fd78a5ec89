//! Well known entry points and vectors of the BBC Micro MOS.

use bimap::BiMap;
use once_cell::sync::Lazy;

#[rustfmt::skip]
const CALLS: &[(u16, &str)] = &[
    (0xFFB9, "OSRDRM"),
    (0xFFBF, "OSEVEN"),
    (0xFFC2, "GSINIT"),
    (0xFFC5, "GSREAD"),
    (0xFFC8, "NVRDCH"), // non-vectored OSRDCH
    (0xFFCB, "NVWRCH"), // non-vectored OSWRCH
    (0xFFCE, "OSFIND"),
    (0xFFE0, "OSRDCH"),
    (0xFFE3, "OSASCI"),
    (0xFFE7, "OSNEWL"),
    (0xFFEE, "OSWRCH"),
    (0xFFF1, "OSWORD"),
    (0xFFF4, "OSBYTE"),
    (0xFFF7, "OSCLI"),
];

// Each vector is two bytes wide, only the base address is listed.
#[rustfmt::skip]
const VECTORS: &[(u16, &str)] = &[
    (0x0200, "USERV"),
    (0x0202, "BRKV"),
    (0x0204, "IRQ1V"),
    (0x0206, "IRQ2V"),
    (0x0208, "CLIV"),
    (0x020A, "BYTEV"),
    (0x020C, "WORDV"),
    (0x020E, "WRCHV"),
    (0x0210, "RDCHV"),
    (0x0212, "FILEV"),
    (0x0214, "ARGV"),
    (0x0216, "BGETV"),
    (0x0218, "BPUTV"),
    (0x021A, "GBPBV"),
    (0x021C, "FINDV"),
    (0x021E, "FSCV"),
    (0x0220, "EVENTV"),
    (0x0222, "UPTV"),
    (0x0224, "NETV"),
    (0x0226, "VDUV"),
    (0x0228, "KEYV"),
    (0x022A, "INSV"),
    (0x022C, "REMV"),
    (0x022E, "CNPV"),
    (0x0230, "IND1V"), // not in the Advanced User Guide
    (0x0232, "IND2V"),
    (0x0234, "IND3V"),
];

static CALL_MAP: Lazy<BiMap<u16, &'static str>> = Lazy::new(|| CALLS.iter().copied().collect());
static VECTOR_MAP: Lazy<BiMap<u16, &'static str>> =
    Lazy::new(|| VECTORS.iter().copied().collect());

pub fn call_name(addr: u16) -> Option<&'static str> {
    CALL_MAP.get_by_left(&addr).copied()
}

pub fn vector_name(addr: u16) -> Option<&'static str> {
    VECTOR_MAP.get_by_left(&addr).copied()
}

/// A reference to either byte of an OS vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorRef {
    pub base: u16,
    pub name: &'static str,
    pub high: bool,
}

impl VectorRef {
    /// `USERV` for &200, `USERV+1` for &201.
    pub fn symbol(&self) -> String {
        if self.high {
            format!("{}+1", self.name)
        } else {
            self.name.to_string()
        }
    }
}

pub fn vector_ref(addr: u16) -> Option<VectorRef> {
    if let Some(name) = vector_name(addr) {
        return Some(VectorRef {
            base: addr,
            name,
            high: false,
        });
    }
    let base = addr & !1;
    vector_name(base).map(|name| VectorRef {
        base,
        name,
        high: true,
    })
}

/// Names the generated header may define. User symbols must not shadow them.
pub fn is_reserved(name: &str) -> bool {
    CALL_MAP.contains_right(name) || VECTOR_MAP.contains_right(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calls() {
        assert_eq!(call_name(0xFFEE), Some("OSWRCH"));
        assert_eq!(call_name(0xFFEF), None);
        assert_eq!(call_name(0x0200), None);
    }

    #[test]
    fn vectors() {
        assert_eq!(vector_ref(0x020E).map(|v| v.symbol()), Some("WRCHV".into()));
        assert_eq!(vector_ref(0x020F).map(|v| v.symbol()), Some("WRCHV+1".into()));
        assert_eq!(vector_ref(0x020F).map(|v| v.base), Some(0x020E));
        assert_eq!(vector_ref(0x0236), None);
        assert_eq!(vector_ref(0x01FF), None);
    }

    #[test]
    fn reserved() {
        assert!(is_reserved("OSBYTE"));
        assert!(is_reserved("BRKV"));
        assert!(!is_reserved("PTR"));
    }
}
