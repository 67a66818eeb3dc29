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

//! This module defines the `EvaluationPool` trait. That is the abstraction of
//! an order preserving scatter/gather primitive: the one facility the solver
//! relies upon to fan independent function evaluations out to workers.

/// The abstraction of a batch evaluation facility. The solver scatters a
/// batch of immutable inputs, the pool gathers one optional result per input.
///
/// # Contract:
/// + The output vector has exactly one entry per input, *in input order*,
///   no matter in which order the underlying workers processed them.
/// + A failed element (the mapped function returned `None`, or the worker
///   processing it died) is reported as `None` in its slot; it never aborts
///   the rest of the batch and never contaminates any other slot.
/// + No ordering guarantee whatsoever is made among concurrently executing
///   elements.
pub trait EvaluationPool {
    /// Applies `f` to every input and returns the results in input order.
    fn map<I, O, F>(&self, inputs: &[I], f: F) -> Vec<Option<O>>
    where
        I: Send + Sync,
        O: Send,
        F: Fn(&I) -> Option<O> + Send + Sync;
}
