//! Bit packing for pruning-table files.

pub struct Compressor {
    buff: u128,
    len: usize,
    bin: Vec<u8>,
}

impl Compressor {
    pub fn with_capacity(bytes: usize) -> Compressor {
        Compressor {
            buff: 0,
            len: 0,
            bin: Vec::with_capacity(bytes),
        }
    }

    /// Appends the low `size` bits of `data`.
    pub fn push<T>(&mut self, data: T, size: usize)
    where
        u128: From<T>,
    {
        debug_assert!(self.len + size <= 128, "compressor overflow");
        let mask = !(!0_u128 << size);
        self.buff |= (u128::from(data) & mask) << (128 - (self.len + size));
        self.len += size;
        self.flush(false);
    }

    fn flush_byte(&mut self) {
        self.bin.push((self.buff >> 120) as u8);
        self.buff <<= 8;
        self.len = self.len.saturating_sub(8);
    }

    fn flush(&mut self, all: bool) {
        while self.len > if all { 0 } else { 7 } {
            self.flush_byte();
        }
    }

    /// Packed bytes, stored last byte first so `Decompressor` can pop them.
    pub fn finish(mut self) -> Vec<u8> {
        self.flush(true);
        self.bin.reverse();
        self.bin
    }
}

pub struct Decompressor {
    buff: u128,
    len: usize,
    bin: Vec<u8>,
}

impl Decompressor {
    pub fn new(bin: Vec<u8>) -> Decompressor {
        Decompressor {
            buff: 0,
            len: 0,
            bin,
        }
    }

    pub fn pop<T>(&mut self, size: usize) -> Option<T>
    where
        T: TryFrom<u128>,
    {
        if size > (self.len + self.bin.len() * 8) {
            return None;
        }
        self.fetch_until(size);
        let result = (self.buff & ((!(!0_u128 << size)) << (self.len - size))) >> (self.len - size);
        self.len -= size;
        T::try_from(result).ok()
    }

    fn fetch_until(&mut self, size: usize) {
        while self.len < size {
            if !self.fetch_byte() {
                break;
            }
        }
    }

    fn fetch_byte(&mut self) -> bool {
        match self.bin.pop() {
            Some(byte) => {
                self.buff <<= 8;
                self.buff |= byte as u128;
                self.len += 8;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nibbles_come_back_in_order() {
        let values: Vec<u8> = (0..101).map(|i| (i * 7 % 16) as u8).collect();
        let mut compressor = Compressor::with_capacity(64);

        for v in &values {
            compressor.push(*v, 4);
        }
        let packed = compressor.finish();
        assert_eq!(packed.len(), 51);

        let mut decompressor = Decompressor::new(packed);
        let unpacked: Vec<u8> = (0..values.len())
            .map(|_| decompressor.pop(4).unwrap())
            .collect();
        assert_eq!(unpacked, values);
    }

    #[test]
    fn mixed_widths() {
        let mut compressor = Compressor::with_capacity(8);

        compressor.push(0b101_u8, 3);
        compressor.push(0xabcd_u16, 16);
        compressor.push(1_u8, 1);
        let mut decompressor = Decompressor::new(compressor.finish());

        assert_eq!(decompressor.pop::<u8>(3), Some(0b101));
        assert_eq!(decompressor.pop::<u16>(16), Some(0xabcd));
        assert_eq!(decompressor.pop::<u8>(1), Some(1));
        assert_eq!(decompressor.pop::<u8>(8), None);
    }
}
