use std::ops::Index;

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::data::csv::parse_csv;
use crate::error::Result;

/// One labeled example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub input: Vec<f64>,
    /// Target vector compared against the output layer during training.
    pub output: Vec<f64>,
    /// Class id compared against the network's predicted class.
    pub id: usize,
}

impl Sample {
    pub fn new(input: Vec<f64>, output: Vec<f64>, id: usize) -> Sample {
        Sample { input, output, id }
    }

    /// A sample whose target encodes `id` over `n_classes` outputs: one-hot,
    /// or `[id]` for a single-output binary classifier.
    ///
    /// # Panics
    /// Panics if `n_classes != 1` and `id >= n_classes`.
    pub fn labeled(input: Vec<f64>, id: usize, n_classes: usize) -> Sample {
        let output = if n_classes == 1 {
            vec![id as f64]
        } else {
            let mut one_hot = vec![0.0; n_classes];
            one_hot[id] = 1.0;
            one_hot
        };
        Sample { input, output, id }
    }
}

/// An ordered, shuffleable collection of samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Records {
    samples: Vec<Sample>,
}

impl Records {
    pub fn new() -> Records {
        Records::default()
    }

    pub fn from_samples(samples: Vec<Sample>) -> Records {
        Records { samples }
    }

    /// Parses `x1,…,xn,class` rows; see [`parse_csv`].
    pub fn from_csv(data: &[u8], n_classes: usize) -> Result<Records> {
        parse_csv(data, n_classes).map(Records::from_samples)
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Reorders the samples in place.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.samples.shuffle(rng);
    }
}

impl Index<usize> for Records {
    type Output = Sample;

    fn index(&self, index: usize) -> &Sample {
        &self.samples[index]
    }
}

impl FromIterator<Sample> for Records {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Records::from_samples(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Records {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
