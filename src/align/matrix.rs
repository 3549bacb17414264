//! NUC.4.4 nucleotide substitution scores
//!
//! The EDNAFULL matrix over the IUPAC alphabet, including ambiguity codes.
//! Unknown symbols score as `N`; `U` scores as `T`.

const NUC44: [[i32; 15]; 15] = [
    //A   T   G   C   S   W   R   Y   K   M   B   V   H   D   N
    [5, -4, -4, -4, -4, 1, 1, -4, -4, 1, -4, -1, -1, -1, -2], // A
    [-4, 5, -4, -4, -4, 1, -4, 1, 1, -4, -1, -4, -1, -1, -2], // T
    [-4, -4, 5, -4, 1, -4, 1, -4, 1, -4, -1, -1, -4, -1, -2], // G
    [-4, -4, -4, 5, 1, -4, -4, 1, -4, 1, -1, -1, -1, -4, -2], // C
    [-4, -4, 1, 1, -1, -4, -2, -2, -2, -2, -1, -1, -3, -3, -1], // S
    [1, 1, -4, -4, -4, -1, -2, -2, -2, -2, -3, -3, -1, -1, -1], // W
    [1, -4, 1, -4, -2, -2, -1, -4, -2, -2, -3, -1, -3, -1, -1], // R
    [-4, 1, -4, 1, -2, -2, -4, -1, -2, -2, -1, -3, -1, -3, -1], // Y
    [-4, 1, 1, -4, -2, -2, -2, -2, -1, -4, -1, -3, -3, -1, -1], // K
    [1, -4, -4, 1, -2, -2, -2, -2, -4, -1, -3, -1, -1, -3, -1], // M
    [-4, -1, -1, -1, -1, -3, -3, -1, -1, -3, -1, -2, -2, -2, -1], // B
    [-1, -4, -1, -1, -1, -3, -1, -3, -3, -1, -2, -1, -2, -2, -1], // V
    [-1, -1, -4, -1, -3, -1, -3, -1, -3, -1, -2, -2, -1, -2, -1], // H
    [-1, -1, -1, -4, -3, -1, -1, -3, -1, -3, -2, -2, -2, -1, -1], // D
    [-2, -2, -2, -2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1], // N
];

fn symbol_index(base: u8) -> usize {
    match base.to_ascii_uppercase() {
        b'A' => 0,
        b'T' | b'U' => 1,
        b'G' => 2,
        b'C' => 3,
        b'S' => 4,
        b'W' => 5,
        b'R' => 6,
        b'Y' => 7,
        b'K' => 8,
        b'M' => 9,
        b'B' => 10,
        b'V' => 11,
        b'H' => 12,
        b'D' => 13,
        _ => 14,
    }
}

/// Score of aligning base `a` against base `b`
pub fn nuc44(a: u8, b: u8) -> i32 {
    NUC44[symbol_index(a)][symbol_index(b)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_is_symmetric() {
        for (i, row) in NUC44.iter().enumerate() {
            for (j, &score) in row.iter().enumerate() {
                assert_eq!(score, NUC44[j][i], "asymmetry at {},{}", i, j);
            }
        }
    }

    #[test]
    fn test_scores() {
        assert_eq!(nuc44(b'A', b'A'), 5);
        assert_eq!(nuc44(b'A', b'C'), -4);
        assert_eq!(nuc44(b'a', b'A'), 5);
        assert_eq!(nuc44(b'A', b'R'), 1);
        assert_eq!(nuc44(b'N', b'G'), -2);
        assert_eq!(nuc44(b'U', b'T'), 5);
        assert_eq!(nuc44(b'*', b'N'), -1);
    }
}
