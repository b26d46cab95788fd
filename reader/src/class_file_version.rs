use std::fmt;

/// Version of the class file format, stored exactly as found in the file.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct ClassFileVersion {
    pub major: u16,
    pub minor: u16,
}

impl ClassFileVersion {
    pub fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// The Java release that introduced this major version, if it is a known one
    pub fn release(&self) -> Option<JavaRelease> {
        match self.major {
            45 => Some(JavaRelease::Jdk1_1),
            46 => Some(JavaRelease::Jdk1_2),
            47 => Some(JavaRelease::Jdk1_3),
            48 => Some(JavaRelease::Jdk1_4),
            49 => Some(JavaRelease::Jdk1_5),
            50 => Some(JavaRelease::Jdk6),
            51 => Some(JavaRelease::Jdk7),
            52 => Some(JavaRelease::Jdk8),
            53 => Some(JavaRelease::Jdk9),
            54 => Some(JavaRelease::Jdk10),
            55 => Some(JavaRelease::Jdk11),
            56 => Some(JavaRelease::Jdk12),
            57 => Some(JavaRelease::Jdk13),
            58 => Some(JavaRelease::Jdk14),
            59 => Some(JavaRelease::Jdk15),
            60 => Some(JavaRelease::Jdk16),
            61 => Some(JavaRelease::Jdk17),
            62 => Some(JavaRelease::Jdk18),
            63 => Some(JavaRelease::Jdk19),
            64 => Some(JavaRelease::Jdk20),
            65 => Some(JavaRelease::Jdk21),
            66 => Some(JavaRelease::Jdk22),
            _ => None,
        }
    }
}

impl fmt::Display for ClassFileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(release) = self.release() {
            write!(f, " ({release})")?;
        }
        Ok(())
    }
}

/// Java releases, identified by the major version of the class files they produce.
#[derive(Debug, PartialEq, Eq, Clone, Copy, strum_macros::Display)]
pub enum JavaRelease {
    Jdk1_1,
    Jdk1_2,
    Jdk1_3,
    Jdk1_4,
    Jdk1_5,
    Jdk6,
    Jdk7,
    Jdk8,
    Jdk9,
    Jdk10,
    Jdk11,
    Jdk12,
    Jdk13,
    Jdk14,
    Jdk15,
    Jdk16,
    Jdk17,
    Jdk18,
    Jdk19,
    Jdk20,
    Jdk21,
    Jdk22,
}
