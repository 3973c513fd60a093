use typed_builder::TypedBuilder;

/// Construction-time options for a [`GameBoy`](crate::GameBoy).
///
/// ```
/// use dotmatrix_core::MachineOptions;
///
/// let options = MachineOptions::builder().history_len(64).build();
/// assert!(options.boot_rom.is_none());
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct MachineOptions {
    /// 256-byte boot ROM mapped over 0x0000-0x00FF until 0xFF50 is written.
    /// Without one the machine starts in the post-boot state at PC=0x0100.
    #[builder(default, setter(strip_option))]
    pub boot_rom: Option<Vec<u8>>,
    /// Number of executed instructions remembered for fault reports.
    #[builder(default = 32)]
    pub history_len: usize,
}

impl Default for MachineOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}
