use crate::dataset::AddressedVector;
use crate::error::{PhenopermError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Returned by [`RankedList::get_rank`] for names absent from the list
pub const RANK_NOT_FOUND: isize = -1;

/// Which scores of a ranked list to keep
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum ScoreMode {
    /// Scores >= 0
    PosOnly,
    /// Scores < 0
    NegOnly,
    PosAndNeg,
}

/// Named, order-preserving set of gene (or sample) names
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneSet {
    name: String,
    members: Vec<String>,
}

impl GeneSet {
    /// Repeated members are kept once, at their first occurrence
    pub fn new(name: impl Into<String>, members: Vec<String>) -> GeneSet {
        let mut seen = HashSet::new();
        let members = members.into_iter().filter(|m| seen.insert(m.clone())).collect();
        GeneSet {
            name: name.into(),
            members,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn num_members(&self) -> usize {
        self.members.len()
    }

    pub fn is_member(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }
}

/// Ordered (name, score) pairs where the rank of a name is its position. The list does not sort its
/// input: callers pass names already in rank order.
#[derive(Clone, PartialEq, Serialize)]
pub struct RankedList {
    name: String,
    ranked_names: Vec<String>,
    scores: Vec<f64>,
    #[serde(skip)]
    rank_index: HashMap<String, usize>,
}

impl RankedList {
    pub fn new(
        name: impl Into<String>,
        ranked_names: Vec<String>,
        scores: Vec<f64>,
    ) -> Result<RankedList> {
        let name = name.into();
        if ranked_names.len() != scores.len() {
            return Err(PhenopermError::SizeMismatch {
                what: format!("names and scores of ranked list {}", name),
                left: ranked_names.len(),
                right: scores.len(),
            });
        }
        let mut rank_index = HashMap::with_capacity(ranked_names.len());
        for (rank, gene) in ranked_names.iter().enumerate() {
            if rank_index.insert(gene.clone(), rank).is_some() {
                return Err(PhenopermError::DuplicateName {
                    name: gene.clone(),
                    context: format!("ranked list {}", name),
                });
            }
        }

        Ok(RankedList {
            name,
            ranked_names,
            scores,
            rank_index,
        })
    }

    /// Name each addressed row with `row_names[address]`, keeping the vector order as rank order
    pub fn from_addressed(
        name: impl Into<String>,
        vector: &AddressedVector,
        row_names: &[String],
    ) -> Result<RankedList> {
        let names = vector
            .addresses()
            .iter()
            .map(|&a| {
                row_names
                    .get(a)
                    .cloned()
                    .ok_or_else(|| PhenopermError::out_of_range("row names", a, row_names.len()))
            })
            .collect::<Result<Vec<String>>>()?;
        RankedList::new(name, names, vector.scores().to_vec())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.ranked_names.len()
    }

    pub fn ranked_names(&self) -> &[String] {
        &self.ranked_names
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn name_at(&self, rank: usize) -> Result<&str> {
        self.ranked_names
            .get(rank)
            .map(|s| s.as_str())
            .ok_or_else(|| {
                let what = format!("ranked list {}", self.name);
                PhenopermError::out_of_range(what, rank, self.size())
            })
    }

    pub fn score_at(&self, rank: usize) -> Result<f64> {
        self.scores
            .get(rank)
            .copied()
            .ok_or_else(|| {
                let what = format!("ranked list {}", self.name);
                PhenopermError::out_of_range(what, rank, self.size())
            })
    }

    /// Rank of `name`, or [`RANK_NOT_FOUND`] when it is not in the list
    pub fn get_rank(&self, name: &str) -> isize {
        self.rank_index
            .get(name)
            .map(|&rank| rank as isize)
            .unwrap_or(RANK_NOT_FOUND)
    }

    /// Score of `name`; unlike `get_rank` a missing name is an error
    pub fn get_score(&self, name: &str) -> Result<f64> {
        self.rank_index
            .get(name)
            .map(|&rank| self.scores[rank])
            .ok_or_else(|| PhenopermError::UnknownName {
                name: name.to_string(),
                context: format!("ranked list {}", self.name),
            })
    }

    /// Members of `gene_set` present in this list, ordered by their rank here
    pub fn extract_ranked(&self, gene_set: &GeneSet) -> Result<RankedList> {
        let mut ranks: Vec<usize> = gene_set
            .members()
            .iter()
            .filter_map(|m| self.rank_index.get(m).copied())
            .collect();
        ranks.sort_unstable();
        self.from_ranks(format!("{}_{}", self.name, gene_set.name()), &ranks)
    }

    /// Entries matching `mode`, in their original relative order
    pub fn extract_ranked_by_score_mode(&self, mode: ScoreMode) -> Result<RankedList> {
        let ranks: Vec<usize> = (0..self.size())
            .filter(|&r| match mode {
                ScoreMode::PosOnly => self.scores[r] >= 0.0,
                ScoreMode::NegOnly => self.scores[r] < 0.0,
                ScoreMode::PosAndNeg => true,
            })
            .collect();
        let suffix = match mode {
            ScoreMode::PosOnly => "pos",
            ScoreMode::NegOnly => "neg",
            ScoreMode::PosAndNeg => "all",
        };
        self.from_ranks(format!("{}_{}", self.name, suffix), &ranks)
    }

    fn from_ranks(&self, name: String, ranks: &[usize]) -> Result<RankedList> {
        let names = ranks.iter().map(|&r| self.ranked_names[r].clone()).collect();
        let scores = ranks.iter().map(|&r| self.scores[r]).collect();
        RankedList::new(name, names, scores)
    }
}

impl fmt::Display for RankedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}   Size: {}", self.name, self.size())?;
        for (gene, score) in self.ranked_names.iter().zip(self.scores.iter()).take(20) {
            writeln!(f, "{:<20} {:.4}", gene, score)?;
        }
        Ok(())
    }
}

impl fmt::Debug for RankedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Order, SortMode};
    use crate::string_vec;

    impl RankedList {
        pub fn test() -> RankedList {
            RankedList::new("ranked", string_vec!["g1", "g2", "g3", "g4"], vec![5.0, 3.0, -1.0, -4.0]).unwrap()
        }
    }

    #[test]
    fn test_lookups() {
        let list = RankedList::test();
        assert_eq!(list.size(), 4);
        assert_eq!(list.get_rank("g3"), 2);
        assert_eq!(list.get_score("g2").unwrap(), 3.0);
        assert_eq!(list.name_at(3).unwrap(), "g4");
        assert_eq!(list.score_at(0).unwrap(), 5.0);
        assert!(list.name_at(4).is_err());
    }

    #[test]
    fn test_missing_name_rank_is_sentinel_but_score_is_error() {
        let list = RankedList::test();
        assert_eq!(list.get_rank("nope"), RANK_NOT_FOUND, "unknown names have rank -1");
        assert!(matches!(list.get_score("nope"), Err(PhenopermError::UnknownName { .. })), "unknown names have no score");
    }

    #[test]
    fn test_construction_errors() {
        assert!(matches!(
            RankedList::new("bad", string_vec!["a", "b"], vec![1.0]),
            Err(PhenopermError::SizeMismatch { .. })
        ));
        assert!(matches!(
            RankedList::new("bad", string_vec!["a", "a"], vec![1.0, 2.0]),
            Err(PhenopermError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_extract_ranked_keeps_source_rank_order() {
        let list = RankedList::new("ranked", string_vec!["g1", "g2", "g3"], vec![5.0, 3.0, 1.0]).unwrap();
        let set = GeneSet::new("set", string_vec!["g3", "g1", "absent"]);
        let extracted = list.extract_ranked(&set).unwrap();
        assert_eq!(extracted.ranked_names().to_vec(), vec!["g1".to_string(), "g3".to_string()]);
        assert_eq!(extracted.scores(), &[5.0, 1.0]);
        assert_eq!(extracted.get_rank("g3"), 1, "the extracted list is re-ranked");
    }

    #[test]
    fn test_extract_by_score_mode() {
        let list = RankedList::test();
        let pos = list.extract_ranked_by_score_mode(ScoreMode::PosOnly).unwrap();
        assert_eq!(pos.ranked_names().to_vec(), vec!["g1".to_string(), "g2".to_string()]);
        let neg = list.extract_ranked_by_score_mode(ScoreMode::NegOnly).unwrap();
        assert_eq!(neg.scores(), &[-1.0, -4.0]);
        assert_eq!(list.extract_ranked_by_score_mode(ScoreMode::PosAndNeg).unwrap().size(), 4);
    }

    #[test]
    fn test_from_addressed() {
        let vector = AddressedVector::from_scores(&[0.1, 0.9, 0.5], SortMode::Real, Order::Descending);
        let rows: Vec<String> = string_vec!["a", "b", "c"];
        let list = RankedList::from_addressed("rows", &vector, &rows).unwrap();
        assert_eq!(list.ranked_names().to_vec(), vec!["b".to_string(), "c".to_string(), "a".to_string()]);
        assert_eq!(list.scores(), &[0.9, 0.5, 0.1]);
    }

    #[test]
    fn test_gene_set_deduplicates() {
        let set = GeneSet::new("set", string_vec!["a", "b", "a"]);
        assert_eq!(set.num_members(), 2);
        assert!(set.is_member("b"));
        assert!(!set.is_member("c"));
    }
}
