//! Determinant strings and their single-excitation link tables.
//!
//! A string is the occupation bit pattern of one spin channel. For a given
//! `(norb, nelec)` all strings are ordered by ascending integer value, and the
//! address of a string is its rank in that order (combinatorial number system).
//!
//! The link table of a string lists every `a†_a a_i` that keeps it inside the
//! `(norb, nelec)` space:
//! - first the `nelec` diagonal entries `a == i` over occupied orbitals, ascending
//! - then all `i -> a` excitations, occupied `i` outer, virtual `a` inner

use crate::error::FciError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

const MAX_ORBITALS: usize = 64;

/// `C(n, k)`, zero when `k > n`.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 1..=k {
        acc = acc * (n - k + i) as u128 / i as u128;
    }
    acc as usize
}

/// Number of strings with `nelec` electrons in `norb` orbitals.
pub fn num_strings(norb: usize, nelec: usize) -> usize {
    binomial(norb, nelec)
}

fn check_space(norb: usize, nelec: usize) -> Result<(), FciError> {
    if norb > MAX_ORBITALS {
        return Err(FciError::TooManyOrbitals { norb });
    }
    if nelec > norb {
        return Err(FciError::InvalidElectronCount { nelec, norb });
    }
    Ok(())
}

/// All strings of the space in ascending order.
pub fn gen_strings(norb: usize, nelec: usize) -> Result<Vec<u64>, FciError> {
    check_space(norb, nelec)?;
    if nelec == 0 {
        return Ok(vec![0]);
    }

    // Gosper's hack; u128 keeps the carry out of bit 63 representable
    let limit: u128 = 1 << norb;
    let mut strings = Vec::with_capacity(num_strings(norb, nelec));
    let mut x: u128 = (1 << nelec) - 1;
    while x < limit {
        strings.push(x as u64);
        let c = x & x.wrapping_neg();
        let r = x + c;
        x = (((r ^ x) >> 2) / c) | r;
    }
    Ok(strings)
}

/// Address of `string` among all strings with the same electron count.
pub fn str_to_addr(string: u64) -> usize {
    occupied_orbitals(string)
        .enumerate()
        .map(|(k, orb)| binomial(orb, k + 1))
        .sum()
}

/// Occupied orbitals of a string, ascending.
pub fn occupied_orbitals(string: u64) -> impl Iterator<Item = usize> {
    (0..MAX_ORBITALS).filter(move |&p| string & (1u64 << p) != 0)
}

/// Parity of `a†_p a_q` acting on `string`: the number of occupied orbitals
/// strictly between `p` and `q`.
pub fn cre_des_sign(p: usize, q: usize, string: u64) -> f64 {
    if p == q {
        return 1.0;
    }
    let (hi, lo) = if p > q { (p, q) } else { (q, p) };
    let mask = (1u64 << hi) - (1u64 << (lo + 1));
    if (string & mask).count_ones() % 2 == 1 {
        -1.0
    } else {
        1.0
    }
}

/// One signed excitation: `a†_a a_i |source⟩ = sign |str1⟩`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkEntry {
    pub a: usize,
    pub i: usize,
    pub str1: usize,
    pub sign: f64,
}

/// Link tables for every string of one `(norb, nelec)` space.
#[derive(Debug, Clone)]
pub struct LinkIndex {
    norb: usize,
    nelec: usize,
    strings: Vec<u64>,
    tables: Vec<Vec<LinkEntry>>,
}

impl LinkIndex {
    pub fn build(norb: usize, nelec: usize) -> Result<Self, FciError> {
        let strings = gen_strings(norb, nelec)?;
        let nlink = nelec + nelec * (norb - nelec);

        let tables = strings
            .iter()
            .map(|&str0| {
                let occ: Vec<usize> = occupied_orbitals(str0).collect();
                let vir: Vec<usize> = (0..norb).filter(|p| str0 & (1u64 << p) == 0).collect();
                let addr0 = str_to_addr(str0);

                let mut tab = Vec::with_capacity(nlink);
                tab.extend(occ.iter().map(|&i| LinkEntry {
                    a: i,
                    i,
                    str1: addr0,
                    sign: 1.0,
                }));
                for &i in &occ {
                    for &a in &vir {
                        let str1 = (str0 ^ (1u64 << i)) | (1u64 << a);
                        tab.push(LinkEntry {
                            a,
                            i,
                            str1: str_to_addr(str1),
                            sign: cre_des_sign(a, i, str0),
                        });
                    }
                }
                tab
            })
            .collect();

        Ok(LinkIndex {
            norb,
            nelec,
            strings,
            tables,
        })
    }

    pub fn norb(&self) -> usize {
        self.norb
    }

    pub fn nelec(&self) -> usize {
        self.nelec
    }

    pub fn nstrings(&self) -> usize {
        self.strings.len()
    }

    pub fn strings(&self) -> &[u64] {
        &self.strings
    }

    pub fn table(&self, str0: usize) -> &[LinkEntry] {
        &self.tables[str0]
    }

    /// `(source address, table)` pairs in address order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[LinkEntry])> {
        self.tables.iter().map(Vec::as_slice).enumerate()
    }

    /// Occupied orbitals of string `str0`, read from its diagonal entries.
    pub fn occupied(&self, str0: usize) -> impl Iterator<Item = usize> + '_ {
        self.tables[str0][..self.nelec].iter().map(|e| e.a)
    }
}

/// Source of canonical string orderings and link tables.
///
/// Two calls with the same `(norb, nelec)` must observe the same ordering and
/// parity convention.
pub trait StringIndexer: Send + Sync {
    fn num_strings(&self, norb: usize, nelec: usize) -> usize {
        num_strings(norb, nelec)
    }

    fn link_index(&self, norb: usize, nelec: usize) -> Result<Arc<LinkIndex>, FciError>;
}

/// Builds each link table once per `(norb, nelec)` and shares it afterwards.
#[derive(Debug, Default)]
pub struct CachedStringIndexer {
    cache: Mutex<HashMap<(usize, usize), Arc<LinkIndex>>>,
}

impl CachedStringIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cached_spaces(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl StringIndexer for CachedStringIndexer {
    fn link_index(&self, norb: usize, nelec: usize) -> Result<Arc<LinkIndex>, FciError> {
        // a poisoned lock only means another caller panicked mid-insert; the
        // map itself holds fully built tables
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(link) = cache.get(&(norb, nelec)) {
            return Ok(Arc::clone(link));
        }

        let link = Arc::new(LinkIndex::build(norb, nelec)?);
        debug!(
            "Built link index: norb={}, nelec={}, strings={}",
            norb,
            nelec,
            link.nstrings()
        );
        cache.insert((norb, nelec), Arc::clone(&link));
        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sign of `a†_p a_q |s⟩` from sequential operator application with
    /// orbitals ordered ascending.
    fn explicit_sign(p: usize, q: usize, s: u64) -> f64 {
        let below = |x: u64, k: usize| (x & ((1u64 << k) - 1)).count_ones();
        let mid = s & !(1u64 << q);
        let n = below(s, q) + below(mid, p);
        if n % 2 == 0 {
            1.0
        } else {
            -1.0
        }
    }

    #[test]
    fn test_num_strings() {
        assert_eq!(num_strings(6, 2), 15);
        assert_eq!(num_strings(4, 0), 1);
        assert_eq!(num_strings(4, 4), 1);
        assert_eq!(num_strings(3, 4), 0);
        assert_eq!(num_strings(64, 32), 1_832_624_140_942_590_534);
    }

    #[test]
    fn test_strings_are_ascending_and_addressed_by_rank() {
        let strings = gen_strings(6, 3).unwrap();
        assert_eq!(strings.len(), num_strings(6, 3));
        for (addr, pair) in strings.windows(2).enumerate() {
            assert!(pair[0] < pair[1]);
            assert_eq!(str_to_addr(pair[0]), addr);
        }
        for (addr, &s) in strings.iter().enumerate() {
            assert_eq!(s.count_ones(), 3);
            assert_eq!(str_to_addr(s), addr);
        }
    }

    #[test]
    fn test_gen_strings_boundaries() {
        assert_eq!(gen_strings(5, 0).unwrap(), vec![0]);
        assert_eq!(gen_strings(3, 3).unwrap(), vec![0b111]);
        assert_eq!(gen_strings(0, 0).unwrap(), vec![0]);
        assert!(matches!(
            gen_strings(2, 3),
            Err(FciError::InvalidElectronCount { nelec: 3, norb: 2 })
        ));
        assert!(matches!(
            gen_strings(65, 1),
            Err(FciError::TooManyOrbitals { norb: 65 })
        ));
    }

    #[test]
    fn test_cre_des_sign_matches_sequential_application() {
        for s in gen_strings(6, 3).unwrap() {
            for q in occupied_orbitals(s) {
                for p in 0..6 {
                    if p != q && s & (1u64 << p) != 0 {
                        continue;
                    }
                    assert_eq!(
                        cre_des_sign(p, q, s),
                        explicit_sign(p, q, s),
                        "p={p} q={q} s={s:#b}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_link_table_layout() {
        let link = LinkIndex::build(4, 2).unwrap();
        assert_eq!(link.nstrings(), 6);
        for (str0, tab) in link.iter() {
            assert_eq!(tab.len(), 2 + 2 * 2);
            // diagonal block first
            for e in &tab[..2] {
                assert_eq!(e.a, e.i);
                assert_eq!(e.str1, str0);
                assert_eq!(e.sign, 1.0);
            }
            let s = link.strings()[str0];
            for e in &tab[2..] {
                let expect = (s ^ (1u64 << e.i)) | (1u64 << e.a);
                assert_eq!(link.strings()[e.str1], expect);
            }
        }
        let occ: Vec<usize> = link.occupied(5).collect();
        assert_eq!(occ, vec![2, 3]);
    }

    #[test]
    fn test_empty_channel_has_single_string() {
        let link = LinkIndex::build(3, 0).unwrap();
        assert_eq!(link.nstrings(), 1);
        assert!(link.table(0).is_empty());
    }

    #[test]
    fn test_cached_indexer_shares_tables() {
        let indexer = CachedStringIndexer::new();
        let a = indexer.link_index(5, 2).unwrap();
        let b = indexer.link_index(5, 2).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        indexer.link_index(5, 3).unwrap();
        assert_eq!(indexer.cached_spaces(), 2);
        assert_eq!(indexer.num_strings(5, 2), 10);
    }
}
