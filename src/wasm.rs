//! Bindings for driving a [`Knight`] from JavaScript.

use itertools::Itertools;
use js_sys::Uint32Array;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;

use crate::builder::{StartSquare, TourBuilder};
use crate::knight::Knight;
use crate::location::Square;

/// A seeded knight's tour, driven from JavaScript.
#[wasm_bindgen]
pub struct WasmKnight {
    inner: Knight<StdRng>,
    note: Option<String>,
}

#[wasm_bindgen]
impl WasmKnight {
    /// Place a knight on a `ranks` by `files` board. A negative `start` picks a random square.
    #[wasm_bindgen(constructor)]
    pub fn new(ranks: usize, files: usize, start: i64, seed: u64) -> Result<WasmKnight, JsValue> {
        let start = match usize::try_from(start) {
            Ok(square) => StartSquare::At(square),
            Err(_) => StartSquare::Random,
        };

        let launch = TourBuilder::with_size(ranks, files)
            .start(start)
            .seed(seed)
            .build()
            .map_err(|reasons| JsValue::from_str(&reasons.iter().join("; ")))?;

        Ok(Self {
            inner: launch.knight,
            note: launch.note.map(|note| note.to_string()),
        })
    }

    /// Run the whole traversal. Returns `true` on a complete tour, `false` if the knight got stuck.
    pub fn traverse(&mut self) -> bool {
        self.inner.traverse().is_ok()
    }

    /// Like [`traverse`](Self::traverse), but give up after `max_pivots` pivots.
    #[wasm_bindgen(js_name = traverseWithin)]
    pub fn traverse_within(&mut self, max_pivots: usize) -> bool {
        self.inner.traverse_within(max_pivots).is_ok()
    }

    /// The squares visited so far, in order.
    #[wasm_bindgen(js_name = currentPath)]
    pub fn current_path(&self) -> Result<Uint32Array, JsValue> {
        let path = square_indices(self.inner.current_path())
            .map_err(|square| JsValue::from_str(&format!("square {square} does not fit in a Uint32Array")))?;
        Ok(Uint32Array::from(path.as_slice()))
    }

    /// The square the knight is on.
    #[wasm_bindgen(js_name = currentSquare)]
    pub fn current_square(&self) -> usize {
        self.inner.current_square()
    }

    /// Set when the requested start square was off the board.
    #[wasm_bindgen(getter)]
    pub fn note(&self) -> Option<String> {
        self.note.clone()
    }

    /// The board with move numbers, as text.
    pub fn render(&self) -> String {
        self.inner.tour().to_string()
    }
}

// on wasm32 every square fits; elsewhere the first square that does not is returned
fn square_indices(path: &[Square]) -> Result<Vec<u32>, Square> {
    path.iter()
        .map(|square| u32::try_from(*square).map_err(|_| *square))
        .collect()
}
