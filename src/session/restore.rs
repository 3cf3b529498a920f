use std::sync::{Arc, mpsc};

use image::RgbaImage;

use crate::canvas::LayerId;
use crate::utils::exporter::decode_png;

/// One layer's pixels decoded off the UI thread.
pub struct DecodedLayer {
    /// Load generation the decode was scheduled under.
    pub generation: u64,
    pub layer: LayerId,
    /// `None` when the stored bytes could not be decoded.
    pub pixels: Option<RgbaImage>,
}

/// Background PNG decodes for history restores.
///
/// Results come back in completion order. Each carries the load generation it was
/// scheduled under; the session drops any result whose generation is no longer current.
pub struct RestoreQueue {
    tx: mpsc::Sender<DecodedLayer>,
    rx: mpsc::Receiver<DecodedLayer>,
    in_flight: usize,
}

impl Default for RestoreQueue {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx, in_flight: 0 }
    }
}

impl RestoreQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes not yet collected, stale ones included.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn schedule(&mut self, generation: u64, layer: LayerId, png: Arc<[u8]>) {
        let tx = self.tx.clone();
        self.in_flight += 1;
        rayon::spawn(move || {
            let pixels = match decode_png(&png) {
                Ok(pixels) => Some(pixels),
                Err(err) => {
                    log::warn!("{layer}: snapshot decode failed, restoring blank: {err}");
                    None
                }
            };
            let _ = tx.send(DecodedLayer {
                generation,
                layer,
                pixels,
            });
        });
    }

    /// Everything that has finished, without blocking.
    pub fn drain(&mut self) -> Vec<DecodedLayer> {
        let done: Vec<DecodedLayer> = self.rx.try_iter().collect();
        self.in_flight -= done.len();
        done
    }

    /// Block until every scheduled decode has reported back.
    pub fn wait_all(&mut self) -> Vec<DecodedLayer> {
        let mut done = Vec::with_capacity(self.in_flight);
        while self.in_flight > 0 {
            match self.rx.recv() {
                Ok(result) => {
                    self.in_flight -= 1;
                    done.push(result);
                }
                Err(_) => break,
            }
        }
        done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::exporter::encode_png;

    #[test]
    fn decodes_arrive_with_their_generation() {
        let mut queue = RestoreQueue::new();
        let img = RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 4]));
        let png: Arc<[u8]> = encode_png(&img).unwrap().into();
        queue.schedule(7, LayerId(1), png);
        queue.schedule(8, LayerId(2), Arc::from(Vec::new()));
        assert_eq!(queue.in_flight(), 2);

        let mut done = queue.wait_all();
        done.sort_by_key(|d| d.generation);
        assert_eq!(queue.in_flight(), 0);
        assert_eq!(done[0].layer, LayerId(1));
        assert_eq!(done[0].pixels.as_ref(), Some(&img));
        assert_eq!(done[1].generation, 8);
        assert!(done[1].pixels.is_none());
    }
}
