use std::collections::VecDeque;

use smartcod_port::{SimpleRead, SimpleWrite, err::Error};

/// In-memory transport: records everything written, replays queued replies
#[derive(Debug, Default)]
pub(crate) struct MockPort {
    pub written: Vec<u8>,
    pub replies: VecDeque<u8>,
    pub flushes: usize,
}

impl MockPort {
    pub fn with_replies(replies: &[u8]) -> Self {
        Self {
            replies: replies.iter().copied().collect(),
            ..Default::default()
        }
    }
}

impl SimpleRead for MockPort {
    fn read(&mut self, buf: &mut [u8]) -> smartcod_port::Result<()> {
        let n = buf.len();
        if self.replies.len() < n {
            return Err(Error::Exhausted(self.replies.len(), n));
        }
        for (dst, src) in buf.iter_mut().zip(self.replies.drain(..n)) {
            *dst = src;
        }
        Ok(())
    }
}

impl SimpleWrite for MockPort {
    fn write(&mut self, buf: &[u8]) -> smartcod_port::Result<()> {
        self.written.extend_from_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> smartcod_port::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
