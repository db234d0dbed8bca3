#![deny(missing_docs)]
//! A skip list is a probabilistic data structure that keeps its elements in
//! sorted order and supports insertion, removal, and lookup in expected
//! logarithmic time.
//!
//! A skip list is a linked list with a number of levels. Level 0 links every
//! element in sorted order, and each higher level links a randomly thinned
//! subset of the level below it. Searches start on the highest level and drop
//! down a level whenever the next element would overshoot the target, so the
//! upper levels let a search skip over long runs of elements.
//!
//! The height of each new element is drawn from a geometric distribution,
//! capped at `ceil(log2(len + 1))` so that no element climbs higher than the
//! current size of the list warrants. The random source is injectable, and a
//! seeded list always builds the same layout for the same insertions.
//!
//! Here are some of the properties of this skip list:
//!
//! - Expected `O(log n)` insertion, removal, and lookup
//! - `O(1)` length queries and in-order iteration
//! - Any total order can be supplied as a [`Comparator`]
//! - Duplicates are allowed; equal elements keep their insertion order
//!
//! Here are some of its limitations:
//!
//! - The bounds are expected, not worst case; an unlucky run of heights can
//!   degrade operations towards `O(n)`
//! - It is single threaded; wrap it in a lock to share it between threads
//!
//! This implementation follows William Pugh's 1990 paper
//! ["Skip Lists: A Probabilistic Alternative to Balanced Trees"].
//!
//! ["Skip Lists: A Probabilistic Alternative to Balanced Trees"]: https://15721.courses.cs.cmu.edu/spring2018/papers/08-oltpindexes1/pugh-skiplists-cacm1990.pdf
//!
//! # Examples
//!
//! The following examples are adapted from the examples in the Rust standard
//! library documentation for [`BTreeSet`].
//!
//! ```
//! use skipset::SkipList;
//!
//! let mut books = SkipList::new();
//!
//! // Add some books.
//! books.add("A Dance With Dragons");
//! books.add("To Kill a Mockingbird");
//! books.add("The Odyssey");
//! books.add("The Great Gatsby");
//!
//! // Check for a specific one.
//! if !books.contains(&"The Winds of Winter") {
//!     println!("We have {} books, but The Winds of Winter ain't one.",
//!              books.len());
//! }
//!
//! // Remove a book.
//! books.remove(&"The Odyssey");
//!
//! // Iterate over everything, in order.
//! for book in &books {
//!     println!("{book}");
//! }
//! assert_eq!(books.iter().next(), Some(&"A Dance With Dragons"));
//! ```
//!
//! A `SkipList` with a known list of items can be initialized from an array:
//!
//! ```
//! use skipset::SkipList;
//!
//! let set = SkipList::from([1, 2, 3]);
//! assert_eq!(set.len(), 3);
//! ```
//!
//! A seeded list makes node heights reproducible, and a custom comparator
//! changes the order:
//!
//! ```
//! use skipset::{Config, SkipList};
//!
//! let by_length = |a: &&str, b: &&str| a.len().cmp(&b.len());
//! let mut words = SkipList::with_config(by_length, Config::default().seed(42));
//! words.extend(["three", "one", "eleven"]);
//! assert_eq!(words.iter().copied().collect::<Vec<_>>(), ["one", "three", "eleven"]);
//! ```
//!
//! The structure can be validated at any time, which is useful in tests:
//!
//! ```
//! use skipset::{check_integrity, SkipList};
//!
//! let list: SkipList<u32> = (0..1_000).rev().collect();
//! assert!(check_integrity(&list).is_empty());
//! ```
//!
//! [`BTreeSet`]: https://doc.rust-lang.org/std/collections/struct.BTreeSet.html
mod comparator;
mod config;
mod error;
pub mod integrity;
mod skip_list;

pub use comparator::{Comparator, Natural};
pub use config::Config;
pub use error::{Error, Result};
pub use integrity::{check_integrity, Violation};
pub use skip_list::{sample_height, IntoIter, Iter, SkipList};
