//! Relocation bitmap encoder
//!
//! The device loader relocates an image by adding the load address to every
//! byte flagged in the bitmap. Flags are found by assembling the same code at
//! two different origins and noting which bytes moved.

/// Number of bitmap bytes produced for `entry`.
#[inline]
#[must_use]
pub const fn bitmap_len(entry: u16) -> usize {
    (entry as usize).div_ceil(8)
}

/// Encode the divergence between `master` and `diff` below `entry`.
///
/// Bit `j` of byte `i / 8` is set when `master[i + j] != diff[i + j]`, least
/// significant bit first. Indices at or past `entry`, or past either buffer,
/// are never compared and stay clear.
#[must_use]
pub fn encode(master: &[u8], diff: &[u8], entry: u16) -> Vec<u8> {
    let entry = entry as usize;
    let limit = entry.min(master.len()).min(diff.len());

    (0..entry)
        .step_by(8)
        .map(|i| {
            (0..8)
                .filter(|j| i + j < limit && master[i + j] != diff[i + j])
                .fold(0u8, |mask, j| mask | (1 << j))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_images_give_empty_mask() {
        let image: Vec<u8> = (0..=200).collect();
        for entry in [0u16, 1, 7, 8, 9, 150] {
            let bitmap = encode(&image, &image, entry);
            assert_eq!(bitmap.len(), bitmap_len(entry));
            assert!(bitmap.iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn single_difference_sets_single_bit() {
        let master = vec![0x55; 40];
        for k in 0..33 {
            let mut diff = master.clone();
            diff[k] ^= 0xff;

            let bitmap = encode(&master, &diff, 33);
            assert_eq!(bitmap.len(), 5);
            assert_eq!(bitmap.iter().map(|b| b.count_ones()).sum::<u32>(), 1);
            assert_eq!(bitmap[k / 8], 1 << (k % 8));
        }
    }

    #[test]
    fn bytes_at_or_after_entry_are_ignored() {
        let master = [0u8; 16];
        let mut diff = [0u8; 16];
        diff[5] = 1;
        diff[6] = 1;
        diff[12] = 1;

        assert_eq!(encode(&master, &diff, 6), [0b0010_0000]);
    }

    #[test]
    fn partial_last_group() {
        let master = [0u8; 12];
        let diff = [1u8; 12];

        assert_eq!(encode(&master, &diff, 11), [0xff, 0b0000_0111]);
    }

    #[test]
    fn entry_past_buffers_only_compares_what_exists() {
        let master = [0u8; 4];
        let diff = [9u8; 4];

        assert_eq!(encode(&master, &diff, 10), [0b0000_1111, 0]);
    }
}
