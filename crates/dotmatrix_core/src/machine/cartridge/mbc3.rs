use crate::CLOCK_HZ;

/// MBC3 clock counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct RtcRegisters {
    seconds: u8,
    minutes: u8,
    hours: u8,
    /// 9-bit day counter.
    days: u16,
    halted: bool,
    day_carry: bool,
}

impl RtcRegisters {
    fn read(&self, select: u8) -> u8 {
        match select {
            0x08 => self.seconds,
            0x09 => self.minutes,
            0x0A => self.hours,
            0x0B => self.days as u8,
            0x0C => {
                ((self.days >> 8) as u8 & 0x01)
                    | if self.halted { 0x40 } else { 0 }
                    | if self.day_carry { 0x80 } else { 0 }
            }
            _ => 0xFF,
        }
    }

    fn write(&mut self, select: u8, value: u8) {
        match select {
            0x08 => self.seconds = value & 0x3F,
            0x09 => self.minutes = value & 0x3F,
            0x0A => self.hours = value & 0x1F,
            0x0B => self.days = (self.days & 0x100) | value as u16,
            0x0C => {
                self.days = (self.days & 0x0FF) | ((value as u16 & 0x01) << 8);
                self.halted = value & 0x40 != 0;
                self.day_carry = value & 0x80 != 0;
            }
            _ => {}
        }
    }

    /// One second of wall time. Out-of-range values written by software
    /// wrap at the register width without carrying.
    fn advance_second(&mut self) {
        self.seconds = (self.seconds + 1) & 0x3F;
        if self.seconds != 60 {
            return;
        }
        self.seconds = 0;
        self.minutes = (self.minutes + 1) & 0x3F;
        if self.minutes != 60 {
            return;
        }
        self.minutes = 0;
        self.hours = (self.hours + 1) & 0x1F;
        if self.hours != 24 {
            return;
        }
        self.hours = 0;
        self.days += 1;
        if self.days > 0x1FF {
            self.days = 0;
            self.day_carry = true;
        }
    }
}

/// Where an access to 0xA000..0xBFFF lands on an MBC3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Mbc3Target {
    Disabled,
    Ram(usize),
    Rtc,
}

/// MBC3 bank registers plus the optional real-time clock.
#[derive(Debug, Clone)]
pub(super) struct Mbc3 {
    ram_enabled: bool,
    /// 7-bit, never zero.
    rom_bank: u8,
    /// 0x00..=0x03 selects RAM, 0x08..=0x0C an RTC register.
    select: u8,
    has_rtc: bool,
    rtc: RtcRegisters,
    latched: RtcRegisters,
    latch_armed: bool,
    /// T-cycles into the current second.
    subsecond: u32,
}

impl Mbc3 {
    pub(super) fn new(has_rtc: bool) -> Self {
        Self {
            ram_enabled: false,
            rom_bank: 1,
            select: 0,
            has_rtc,
            rtc: RtcRegisters::default(),
            latched: RtcRegisters::default(),
            latch_armed: false,
            subsecond: 0,
        }
    }

    pub(super) fn rom_bank(&self, addr: u16) -> usize {
        if addr < 0x4000 {
            0
        } else {
            self.rom_bank as usize
        }
    }

    pub(super) fn target(&self) -> Mbc3Target {
        if !self.ram_enabled {
            return Mbc3Target::Disabled;
        }
        match self.select {
            0x00..=0x03 => Mbc3Target::Ram(self.select as usize),
            0x08..=0x0C if self.has_rtc => Mbc3Target::Rtc,
            _ => Mbc3Target::Disabled,
        }
    }

    pub(super) fn write_register(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enabled = value & 0x0F == 0x0A,
            0x2000..=0x3FFF => {
                self.rom_bank = match value & 0x7F {
                    0 => 1,
                    bank => bank,
                };
                log::trace!("MBC3 ROM bank 0x{:02X}", self.rom_bank);
            }
            0x4000..=0x5FFF => self.select = value,
            0x6000..=0x7FFF => {
                if self.latch_armed && value == 0x01 {
                    self.latched = self.rtc;
                    log::trace!("MBC3 RTC latched: {:?}", self.latched);
                }
                self.latch_armed = value == 0x00;
            }
            _ => {}
        }
    }

    /// Reads come from the latched copy.
    pub(super) fn read_rtc(&self) -> u8 {
        self.latched.read(self.select)
    }

    /// Writes go to the live counters and the latched copy alike.
    pub(super) fn write_rtc(&mut self, value: u8) {
        if self.select == 0x08 {
            self.subsecond = 0;
        }
        self.rtc.write(self.select, value);
        self.latched.write(self.select, value);
    }

    /// Advance the clock by one T-cycle.
    pub(super) fn tick(&mut self) {
        if !self.has_rtc || self.rtc.halted {
            return;
        }
        self.subsecond += 1;
        if self.subsecond == CLOCK_HZ {
            self.subsecond = 0;
            self.rtc.advance_second();
        }
    }
}
