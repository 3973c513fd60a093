use bitflags::bitflags;

bitflags! {
    /// Interrupt lines as laid out in IF (0xFF0F) and IE (0xFFFF).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InterruptFlags: u8 {
        const VBLANK = 1 << 0;
        const LCD_STAT = 1 << 1;
        const TIMER = 1 << 2;
        const SERIAL = 1 << 3;
        const JOYPAD = 1 << 4;
    }
}

/// Interrupt sources in dispatch priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    VBlank,
    LcdStat,
    Timer,
    Serial,
    Joypad,
}

impl Interrupt {
    pub const PRIORITY: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    #[inline]
    pub const fn flag(self) -> InterruptFlags {
        match self {
            Interrupt::VBlank => InterruptFlags::VBLANK,
            Interrupt::LcdStat => InterruptFlags::LCD_STAT,
            Interrupt::Timer => InterruptFlags::TIMER,
            Interrupt::Serial => InterruptFlags::SERIAL,
            Interrupt::Joypad => InterruptFlags::JOYPAD,
        }
    }

    /// Fixed handler address the CPU jumps to when dispatching.
    #[inline]
    pub const fn vector(self) -> u16 {
        match self {
            Interrupt::VBlank => 0x0040,
            Interrupt::LcdStat => 0x0048,
            Interrupt::Timer => 0x0050,
            Interrupt::Serial => 0x0058,
            Interrupt::Joypad => 0x0060,
        }
    }
}

/// IF / IE / IME.
///
/// This is the leaf every interrupt source writes into. IME lives here too;
/// the one-instruction delay of `EI` is tracked by the CPU, which calls
/// [`enable_ime`](Self::enable_ime) once the delay has elapsed.
#[derive(Debug, Clone, Default)]
pub struct InterruptController {
    flags: InterruptFlags,
    enable: u8,
    ime: bool,
}

impl InterruptController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw IF bits (lower 5 only).
    #[inline]
    pub fn flags(&self) -> u8 {
        self.flags.bits()
    }

    #[inline]
    pub fn set_flags(&mut self, value: u8) {
        self.flags = InterruptFlags::from_bits_truncate(value);
    }

    /// IE as last written. All eight bits are stored even though only the
    /// lower five select interrupt lines.
    #[inline]
    pub fn enable(&self) -> u8 {
        self.enable
    }

    #[inline]
    pub fn set_enable(&mut self, value: u8) {
        self.enable = value;
    }

    #[inline]
    pub fn ime(&self) -> bool {
        self.ime
    }

    #[inline]
    pub fn set_ime(&mut self, value: bool) {
        self.ime = value;
    }

    #[inline]
    pub fn enable_ime(&mut self) {
        self.ime = true;
    }

    #[inline]
    pub fn disable_ime(&mut self) {
        self.ime = false;
    }

    #[inline]
    pub fn request(&mut self, interrupt: Interrupt) {
        self.flags |= interrupt.flag();
    }

    #[inline]
    pub fn acknowledge(&mut self, interrupt: Interrupt) {
        self.flags.remove(interrupt.flag());
    }

    /// `IF & IE`, restricted to the five real lines.
    #[inline]
    pub fn pending(&self) -> u8 {
        self.flags.bits() & self.enable & 0x1F
    }

    /// Highest-priority interrupt that is both requested and enabled.
    pub fn highest_pending(&self) -> Option<Interrupt> {
        let pending = InterruptFlags::from_bits_truncate(self.pending());
        Interrupt::PRIORITY
            .into_iter()
            .find(|interrupt| pending.contains(interrupt.flag()))
    }
}
