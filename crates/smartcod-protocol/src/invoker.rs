//! Remote job calls
use std::collections::{HashMap, VecDeque};

use derive_ctor::ctor;
use smartcod_port::{SimpleRead, SimpleWrite};

use crate::{
    Result, SmartBox,
    err::Error,
    params::{Signature, Value},
};

/// Signatures used by earlier calls, keyed by job name regardless of case
#[derive(Debug, Default)]
pub struct SignatureCache {
    signatures: HashMap<String, Signature>,
}

impl SignatureCache {
    fn key(job: &str) -> String {
        job.trim().to_lowercase()
    }

    #[must_use]
    pub fn get(&self, job: &str) -> Option<&Signature> {
        self.signatures.get(&Self::key(job))
    }

    /// Store `signature` for `job`, returning the one it replaces
    pub fn insert(&mut self, job: &str, signature: Signature) -> Option<Signature> {
        self.signatures.insert(Self::key(job), signature)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

/// A session paired with the signature cache of the current run
#[derive(ctor)]
pub struct CallContext<'a, T: SimpleRead + SimpleWrite> {
    session: &'a mut SmartBox<T>,
    cache: &'a mut SignatureCache,
}

impl<T: SimpleRead + SimpleWrite> CallContext<'_, T> {
    /// Call `job` and return its outputs in declaration order.
    ///
    /// `signature` wins over a cached one. Inputs are taken from the front of
    /// `args`, which only loses them once the call went through; whatever is
    /// left belongs to the caller. Nothing reaches the device until the
    /// signature and every argument have been parsed.
    pub fn call(
        &mut self,
        job: &str,
        signature: Option<&str>,
        args: &mut VecDeque<String>,
    ) -> Result<Vec<Value>> {
        let signature = match signature {
            Some(source) => source.parse::<Signature>()?,
            None => self
                .cache
                .get(job)
                .cloned()
                .ok_or_else(|| Error::SignatureUndefined(job.to_owned()))?,
        };

        let inputs = signature.parse_arguments(args.iter().map(String::as_str))?;

        let code = self.session.resolve_job(job)?;
        let outputs = self.session.invoke(code, &inputs, signature.outputs())?;

        args.drain(..inputs.len());
        self.cache.insert(job, signature);

        Ok(outputs)
    }
}
