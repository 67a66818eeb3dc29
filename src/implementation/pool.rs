// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module provides the implementation of the usual evaluation pools:
//! one that dispatches the batch onto as many worker threads as requested
//! (as many as the number of hardware threads by default), and one that
//! processes the batch inline, which doubles as the reference implementation
//! of the ordering contract.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::EvaluationPool;

/// An evaluation pool backed by a crew of worker threads. The inputs of a
/// batch are claimed by the workers in an unspecified order; the results
/// land each in the slot of its own input, so the gathered vector is always
/// in input order.
///
/// # Note:
/// A panicking evaluation is confined to the element that panicked: its slot
/// reports `None` and the rest of the batch proceeds normally. This is the
/// same treatment as an evaluation whose function simply declined to return
/// a result, and it is what keeps one lost worker from poisoning a whole
/// round.
///
/// # Example
/// ```
/// # use tiktak::{EvaluationPool, WorkerPool};
/// let pool = WorkerPool::new().with_nb_workers(2);
/// let doubled = pool.map(&[1, 2, 3], |x| Some(x * 2));
/// assert_eq!(vec![Some(2), Some(4), Some(6)], doubled);
/// ```
#[derive(Debug, Clone)]
pub struct WorkerPool {
    /// How many worker threads process each batch
    nb_workers: usize,
}

impl WorkerPool {
    /// Creates a pool using as many workers as there are hardware threads.
    pub fn new() -> Self {
        WorkerPool {
            nb_workers: num_cpus::get(),
        }
    }
    /// Sets the number of workers processing each batch.
    pub fn with_nb_workers(mut self, nb_workers: usize) -> Self {
        self.nb_workers = nb_workers.max(1);
        self
    }
    /// The number of workers processing each batch.
    pub fn nb_workers(&self) -> usize {
        self.nb_workers
    }
}
impl Default for WorkerPool {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationPool for WorkerPool {
    fn map<I, O, F>(&self, inputs: &[I], f: F) -> Vec<Option<O>>
    where
        I: Send + Sync,
        O: Send,
        F: Fn(&I) -> Option<O> + Send + Sync,
    {
        let nb_inputs = inputs.len();
        if nb_inputs == 0 {
            return vec![];
        }
        let nb_workers = self.nb_workers.min(nb_inputs);
        let next = AtomicUsize::new(0);
        let slots: Mutex<Vec<Option<O>>> =
            Mutex::new((0..nb_inputs).map(|_| None).collect());

        std::thread::scope(|s| {
            for _ in 0..nb_workers {
                s.spawn(|| loop {
                    let i = next.fetch_add(1, Ordering::SeqCst);
                    if i >= nb_inputs {
                        break;
                    }
                    let result =
                        catch_unwind(AssertUnwindSafe(|| f(&inputs[i]))).unwrap_or(None);
                    slots.lock()[i] = result;
                });
            }
        });

        slots.into_inner()
    }
}

/// An evaluation pool processing its batches inline, one element after the
/// other. Useful to take the scheduling noise out of a debugging session,
/// and to state the ordering contract in its purest form.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialPool;

impl EvaluationPool for SequentialPool {
    fn map<I, O, F>(&self, inputs: &[I], f: F) -> Vec<Option<O>>
    where
        I: Send + Sync,
        O: Send,
        F: Fn(&I) -> Option<O> + Send + Sync,
    {
        inputs
            .iter()
            .map(|i| catch_unwind(AssertUnwindSafe(|| f(i))).unwrap_or(None))
            .collect()
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################


#[cfg(test)]
mod test_sequential_pool {
    use crate::{EvaluationPool, SequentialPool};

    #[test]
    fn results_come_back_in_input_order() {
        let inputs = (0..100).collect::<Vec<usize>>();
        let expected = inputs.iter().map(|i| Some(i + 1)).collect::<Vec<_>>();
        assert_eq!(expected, SequentialPool.map(&inputs, |i| Some(i + 1)));
    }
    #[test]
    fn a_panicking_element_is_reported_as_absent() {
        let result = SequentialPool.map(&[1, 2, 3], |i| {
            if *i == 2 {
                panic!("boom");
            }
            Some(*i)
        });
        assert_eq!(vec![Some(1), None, Some(3)], result);
    }
    #[test]
    fn both_pools_agree_on_every_batch() {
        let inputs = (0..50).collect::<Vec<usize>>();
        let f = |i: &usize| if i % 7 == 0 { None } else { Some(i * 3) };
        let parallel = crate::WorkerPool::new().with_nb_workers(4).map(&inputs, f);
        let sequential = SequentialPool.map(&inputs, f);
        assert_eq!(sequential, parallel);
    }
}
