use core::fmt;

/// A firmware method selector: a four character ACPI name packed big-endian.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Method(u32);

impl Method {
    pub const SN00: Self = Self::from_name(*b"SN00");
    pub const SN02: Self = Self::from_name(*b"SN02");
    pub const SN03: Self = Self::from_name(*b"SN03");
    pub const SN05: Self = Self::from_name(*b"SN05");
    pub const SN06: Self = Self::from_name(*b"SN06");
    pub const SN07: Self = Self::from_name(*b"SN07");
    pub const ECON: Self = Self::from_name(*b"ECON");
    pub const GBRT: Self = Self::from_name(*b"GBRT");
    pub const SBRT: Self = Self::from_name(*b"SBRT");
    pub const HSC1: Self = Self::from_name(*b"HSC1");
    pub const DSM: Self = Self::from_name(*b"_DSM");
    /// Release the legacy controller's resources.
    pub const DIS: Self = Self::from_name(*b"_DIS");

    #[inline]
    #[must_use]
    pub const fn from_name(name: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(name))
    }

    #[inline]
    #[must_use]
    pub const fn from_raw(selector: u32) -> Self {
        Self(selector)
    }

    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn name(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.name() {
            if b.is_ascii_graphic() {
                write!(f, "{}", char::from(b))?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_names_big_endian() {
        assert_eq!(Method::SN07.as_u32(), 0x534E_3037);
        assert_eq!(Method::from_raw(0x534E_3037), Method::SN07);
        assert_eq!(Method::DSM.name(), *b"_DSM");
    }

    #[test]
    fn displays_as_text() {
        assert_eq!(format!("{}", Method::GBRT), "GBRT");
        assert_eq!(format!("{:?}", Method::SN00), "Method(SN00)");
        assert_eq!(format!("{}", Method::from_raw(0x4142_0043)), "AB\\x00C");
    }
}
