use core::ptr;
use std::io::{IoSlice, Write};

use crate::{HybridVec, policy::Policy};

/// Write is implemented for `HybridVec<u8, P>` by appending to the vector.
/// The vector grows (and promotes) as needed.
impl<P: Policy> Write for HybridVec<u8, P> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.try_reserve(buf.len())
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::OutOfMemory, err))?;

        let len = self.len();
        // SAFETY: room for `buf.len()` more bytes was reserved above.
        unsafe {
            ptr::copy_nonoverlapping(buf.as_ptr(), self.as_mut_ptr().add(len), buf.len());
            self.set_len(len + buf.len());
        }
        Ok(buf.len())
    }

    #[inline]
    fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> std::io::Result<usize> {
        let total = bufs.iter().map(|b| b.len()).sum::<usize>();
        self.try_reserve(total)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::OutOfMemory, err))?;

        for buf in bufs {
            self.write(buf)?;
        }
        Ok(total)
    }

    #[inline(always)]
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
