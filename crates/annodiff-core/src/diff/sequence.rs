//! Longest-matching-block sequence alignment.
//!
//! Finds the longest contiguous matching block, then recurses on the pieces
//! to its left and right. Works on any `Eq + Hash` element type, so the text
//! differ runs it once over lines and once over characters.
//!
//! For sequences of 200 or more elements, elements of `b` that occur in more
//! than 1% of positions are "popular" and never seed a match (they can still
//! extend one). This keeps the cost near-linear on natural-language text,
//! where spaces and common letters would otherwise dominate.

use std::collections::HashMap;
use std::hash::Hash;

const AUTOJUNK_MIN_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchBlock {
    /// Start in `a`
    pub a: usize,
    /// Start in `b`
    pub b: usize,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// `a[i1..i2]` turns into `b[j1..j2]` by `tag`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub i1: usize,
    pub i2: usize,
    pub j1: usize,
    pub j2: usize,
}

pub struct SequenceMatcher<'a, T: Eq + Hash> {
    a: &'a [T],
    b: &'a [T],
    b2j: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= ntest);
        }

        Self { a, b, b2j }
    }

    /// Longest block with `a[i..i+size] == b[j..j+size]` inside the given ranges
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchBlock {
        let (a, b) = (self.a, self.b);
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0usize);

        // j2len[j] = length of the match ending at a[i-1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, elt) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(elt) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = if j > 0 {
                        j2len.get(&(j - 1)).copied().unwrap_or(0)
                    } else {
                        0
                    };
                    let k = prev + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular elements never seed a match; let them extend one.
        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && a[besti + bestsize] == b[bestj + bestsize]
        {
            bestsize += 1;
        }

        MatchBlock {
            a: besti,
            b: bestj,
            size: bestsize,
        }
    }

    /// Maximal matching blocks in increasing order, ending with a zero-size sentinel
    pub fn matching_blocks(&self) -> Vec<MatchBlock> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut queue = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            if alo < m.a && blo < m.b {
                queue.push((alo, m.a, blo, m.b));
            }
            if m.a + m.size < ahi && m.b + m.size < bhi {
                queue.push((m.a + m.size, ahi, m.b + m.size, bhi));
            }
            blocks.push(m);
        }
        blocks.sort();

        // Merge blocks that touch end-to-start
        let mut merged: Vec<MatchBlock> = Vec::with_capacity(blocks.len() + 1);
        for m in blocks {
            match merged.last_mut() {
                Some(last) if last.a + last.size == m.a && last.b + last.size == m.b => {
                    last.size += m.size;
                }
                _ => merged.push(m),
            }
        }
        merged.push(MatchBlock {
            a: la,
            b: lb,
            size: 0,
        });
        merged
    }

    /// Edit script turning `a` into `b`, including `Equal` spans
    pub fn opcodes(&self) -> Vec<Opcode> {
        let (mut i, mut j) = (0, 0);
        let mut ops = Vec::new();

        for m in self.matching_blocks() {
            let tag = match (i < m.a, j < m.b) {
                (true, true) => Some(OpTag::Replace),
                (true, false) => Some(OpTag::Delete),
                (false, true) => Some(OpTag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                ops.push(Opcode {
                    tag,
                    i1: i,
                    i2: m.a,
                    j1: j,
                    j2: m.b,
                });
            }
            i = m.a + m.size;
            j = m.b + m.size;
            if m.size > 0 {
                ops.push(Opcode {
                    tag: OpTag::Equal,
                    i1: m.a,
                    i2: i,
                    j1: m.b,
                    j2: j,
                });
            }
        }
        ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn block(a: usize, b: usize, size: usize) -> MatchBlock {
        MatchBlock { a, b, size }
    }

    fn op(tag: OpTag, i1: usize, i2: usize, j1: usize, j2: usize) -> Opcode {
        Opcode {
            tag,
            i1,
            i2,
            j1,
            j2,
        }
    }

    #[test]
    fn test_matching_blocks_simple() {
        let a = chars("abxcd");
        let b = chars("abcd");
        let blocks = SequenceMatcher::new(&a, &b).matching_blocks();
        assert_eq!(blocks, vec![block(0, 0, 2), block(3, 2, 2), block(5, 4, 0)]);
    }

    #[test]
    fn test_opcodes_cover_every_tag() {
        let a = chars("qabxcd");
        let b = chars("abycdf");
        let ops = SequenceMatcher::new(&a, &b).opcodes();
        let expected = vec![
            op(OpTag::Delete, 0, 1, 0, 0),
            op(OpTag::Equal, 1, 3, 0, 2),
            op(OpTag::Replace, 3, 4, 2, 3),
            op(OpTag::Equal, 4, 6, 3, 5),
            op(OpTag::Insert, 6, 6, 5, 6),
        ];
        assert_eq!(ops, expected);
    }

    #[test]
    fn test_empty_sides() {
        let empty: Vec<char> = vec![];
        let b = chars("abc");
        let ops = SequenceMatcher::new(&empty, &b).opcodes();
        assert_eq!(ops, vec![op(OpTag::Insert, 0, 0, 0, 3)]);

        let ops = SequenceMatcher::new(&b, &empty).opcodes();
        assert_eq!(ops, vec![op(OpTag::Delete, 0, 3, 0, 0)]);

        assert!(SequenceMatcher::new(&empty, &empty).opcodes().is_empty());
    }

    #[test]
    fn test_identical_sequences_are_one_equal_span() {
        let a = chars("same text");
        let ops = SequenceMatcher::new(&a, &a).opcodes();
        assert_eq!(ops, vec![op(OpTag::Equal, 0, 9, 0, 9)]);
    }

    #[test]
    fn test_works_on_lines() {
        let a = vec!["one\n", "two\n", "three\n"];
        let b = vec!["one\n", "2\n", "three\n", "four\n"];
        let ops = SequenceMatcher::new(&a, &b).opcodes();
        let tags: Vec<OpTag> = ops.iter().map(|o| o.tag).collect();
        assert_eq!(
            tags,
            vec![OpTag::Equal, OpTag::Replace, OpTag::Equal, OpTag::Insert]
        );
    }

    #[test]
    fn test_long_inputs_still_align_with_popular_elements() {
        // 'a' is popular in b (> 1% of 300 positions) yet the common prefix is found
        let mut a = vec!['a'; 300];
        a.extend("xyz".chars());
        let mut b = vec!['a'; 300];
        b.extend("xYz".chars());
        let ops = SequenceMatcher::new(&a, &b).opcodes();
        let non_equal: Vec<&Opcode> = ops.iter().filter(|o| o.tag != OpTag::Equal).collect();
        assert_eq!(non_equal.len(), 1);
        assert_eq!(non_equal[0].tag, OpTag::Replace);
        assert_eq!((non_equal[0].i1, non_equal[0].i2), (301, 302));
    }
}
