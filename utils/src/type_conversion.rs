// Lengths in class files are at most 32 bits wide
const _: () = assert!(std::mem::size_of::<usize>() >= std::mem::size_of::<u32>());

pub trait ToUsizeSafe {
    fn into_usize_safe(self) -> usize;
}

impl ToUsizeSafe for u32 {
    fn into_usize_safe(self) -> usize {
        self as usize
    }
}

impl ToUsizeSafe for u16 {
    fn into_usize_safe(self) -> usize {
        usize::from(self)
    }
}

impl ToUsizeSafe for u8 {
    fn into_usize_safe(self) -> usize {
        usize::from(self)
    }
}
