/// Row ("shelf") packer. Cells are placed left to right; a cell that does not
/// fit the current row starts a new one below the tallest cell placed so far
/// in that row. The width is fixed, the height grows as rows are added
#[derive(Debug)]
pub(crate) struct ShelfPacker {
    width: u32,
    next_x: u32,
    next_y: u32,
    row_height: u32,
}

impl ShelfPacker {
    pub fn new(width: u32) -> Self {
        Self {
            width,
            next_x: 0,
            next_y: 0,
            row_height: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Total height used so far
    pub fn height(&self) -> u32 {
        self.next_y + self.row_height
    }

    /// Top left corner for a `width x height` cell, `None` if the cell is
    /// wider than the packer
    pub fn pack(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        if width > self.width {
            return None;
        }

        if self.next_x + width > self.width {
            self.next_y += self.row_height;
            self.next_x = 0;
            self.row_height = 0;
        }

        let position = (self.next_x, self.next_y);

        self.next_x += width;
        self.row_height = self.row_height.max(height);

        Some(position)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn overlaps(a: (u32, u32, u32, u32), b: (u32, u32, u32, u32)) -> bool {
        a.0 < b.0 + b.2 && b.0 < a.0 + a.2 && a.1 < b.1 + b.3 && b.1 < a.1 + a.3
    }

    #[test]
    fn wraps_below_tallest_cell_of_row() {
        let mut packer = ShelfPacker::new(100);

        assert_eq!(packer.pack(40, 10), Some((0, 0)));
        assert_eq!(packer.pack(40, 30), Some((40, 0)));
        assert_eq!(packer.pack(40, 20), Some((0, 30)));
        assert_eq!(packer.height(), 50);
    }

    #[test]
    fn rejects_cells_wider_than_atlas() {
        let mut packer = ShelfPacker::new(16);

        assert_eq!(packer.pack(17, 1), None);
        assert_eq!(packer.pack(16, 1), Some((0, 0)));
    }

    #[test]
    fn packed_cells_never_overlap() {
        let mut packer = ShelfPacker::new(64);
        let mut cells = Vec::new();

        for i in 0..50u32 {
            let (w, h) = (5 + (i * 7) % 23, 3 + (i * 11) % 17);
            let (x, y) = packer.pack(w, h).unwrap();

            assert!(x + w <= packer.width());
            cells.push((x, y, w, h));
        }

        for (i, &a) in cells.iter().enumerate() {
            for &b in &cells[i + 1..] {
                assert!(!overlaps(a, b), "{:?} overlaps {:?}", a, b);
            }
        }

        assert!(cells.iter().all(|&(_, y, _, h)| y + h <= packer.height()));
    }
}
