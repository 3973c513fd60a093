/// OAM DMA engine.
///
/// A write to 0xFF46 arms a 160-byte copy from `page << 8` into OAM, paced
/// at one byte per T-cycle. The CPU keeps full bus access while a transfer
/// runs.
#[derive(Debug, Clone, Default)]
pub(crate) struct OamDma {
    active: bool,
    /// Last value written to 0xFF46.
    page: u8,
    offset: u8,
}

pub(crate) const OAM_DMA_LEN: u8 = 0xA0;

impl OamDma {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn start(&mut self, page: u8) {
        self.page = page;
        self.offset = 0;
        self.active = true;
        log::trace!("OAM DMA from 0x{:04X}", (page as u16) << 8);
    }

    /// Set the read-back value of 0xFF46 without starting a transfer.
    pub(crate) fn set_page(&mut self, page: u8) {
        self.page = page;
    }

    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub(crate) fn page(&self) -> u8 {
        self.page
    }

    /// Next (source, OAM offset) pair for this T-cycle, advancing the
    /// transfer. Sources at 0xE000 and above read through the WRAM echo.
    pub(crate) fn next_transfer(&mut self) -> Option<(u16, u8)> {
        if !self.active {
            return None;
        }
        let mut source = ((self.page as u16) << 8) | self.offset as u16;
        if source >= 0xE000 {
            source -= 0x2000;
        }
        let offset = self.offset;
        self.offset += 1;
        if self.offset == OAM_DMA_LEN {
            self.active = false;
        }
        Some((source, offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_for_160_transfers() {
        let mut dma = OamDma::new();
        dma.start(0xC0);

        let mut count = 0;
        while let Some((source, offset)) = dma.next_transfer() {
            assert_eq!(source, 0xC000 + offset as u16);
            count += 1;
        }
        assert_eq!(count, 160);
        assert!(!dma.is_active());
        assert_eq!(dma.page(), 0xC0);
    }

    #[test]
    fn high_pages_read_through_echo() {
        let mut dma = OamDma::new();
        dma.start(0xFE);
        assert_eq!(dma.next_transfer(), Some((0xDE00, 0)));
    }

    #[test]
    fn restart_resets_offset() {
        let mut dma = OamDma::new();
        dma.start(0xC0);
        for _ in 0..10 {
            dma.next_transfer();
        }
        dma.start(0xD0);
        assert_eq!(dma.next_transfer(), Some((0xD000, 0)));
    }
}
