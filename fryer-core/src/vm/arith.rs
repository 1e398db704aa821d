//! Aritmética inteira e fixed-point
//!
//! Divisões arredondam para baixo (floor) e o resto tem o sinal do divisor.
//! Todas as operações dão a volta em overflow (`wrapping_*`).

/// Escala do fixed-point: o inteiro armazenado vale `valor / 100`
pub const FIXED_SCALE: i64 = 100;

/// Coerção "não-zero é verdadeiro", usada por AND/OR/NOT/JZ/JNZ/DECJZ
#[inline(always)]
pub fn truthy(value: i64) -> bool {
    value != 0
}

/// Booleano canônico (1 ou 0)
#[inline(always)]
pub fn flag(value: bool) -> i64 {
    value as i64
}

/// Divisão com arredondamento para baixo. `b` não pode ser zero.
#[inline]
pub fn floor_div(a: i64, b: i64) -> i64 {
    let q = a.wrapping_div(b);
    if a.wrapping_rem(b) != 0 && ((a < 0) != (b < 0)) {
        q.wrapping_sub(1)
    } else {
        q
    }
}

/// Resto com o sinal do divisor. `b` não pode ser zero.
#[inline]
pub fn floor_mod(a: i64, b: i64) -> i64 {
    let r = a.wrapping_rem(b);
    if r != 0 && ((r < 0) != (b < 0)) {
        r.wrapping_add(b)
    } else {
        r
    }
}

/// MULF: `(a * b) / 100`
#[inline]
pub fn fixed_mul(a: i64, b: i64) -> i64 {
    floor_div(a.wrapping_mul(b), FIXED_SCALE)
}

/// DIVF: `(a * 100) / b`. `b` não pode ser zero.
#[inline]
pub fn fixed_div(a: i64, b: i64) -> i64 {
    floor_div(a.wrapping_mul(FIXED_SCALE), b)
}

/// ITOF
#[inline]
pub fn int_to_fixed(value: i64) -> i64 {
    value.wrapping_mul(FIXED_SCALE)
}

/// FTOI
#[inline]
pub fn fixed_to_int(value: i64) -> i64 {
    floor_div(value, FIXED_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_div_signs() {
        assert_eq!(floor_div(7, 2), 3);
        assert_eq!(floor_div(-7, 2), -4);
        assert_eq!(floor_div(7, -2), -4);
        assert_eq!(floor_div(-7, -2), 3);
        assert_eq!(floor_div(-8, 2), -4);
    }

    #[test]
    fn test_floor_mod_signs() {
        assert_eq!(floor_mod(7, 3), 1);
        assert_eq!(floor_mod(-7, 3), 2);
        assert_eq!(floor_mod(7, -3), -2);
        assert_eq!(floor_mod(-7, -3), -1);
        assert_eq!(floor_mod(9, 3), 0);
    }

    #[test]
    fn test_div_mod_identity() {
        for a in -20..=20 {
            for b in [-7, -3, -1, 1, 2, 5] {
                assert_eq!(floor_div(a, b) * b + floor_mod(a, b), a);
            }
        }
    }

    #[test]
    fn test_overflow_wraps() {
        assert_eq!(floor_div(i64::MIN, -1), i64::MIN);
        assert_eq!(floor_mod(i64::MIN, -1), 0);
        assert_eq!(int_to_fixed(i64::MAX), i64::MAX.wrapping_mul(100));
    }

    #[test]
    fn test_fixed_point() {
        // 1.50 * 2.25 = 3.375 -> 3.37
        assert_eq!(fixed_mul(150, 225), 337);
        // -1.50 * 2.25 = -3.375 -> floor -3.38
        assert_eq!(fixed_mul(-150, 225), -338);
        // 1.00 / 3.00 = 0.33
        assert_eq!(fixed_div(100, 300), 33);
        assert_eq!(int_to_fixed(7), 700);
        assert_eq!(fixed_to_int(799), 7);
        assert_eq!(fixed_to_int(-1), -1);
    }

    #[test]
    fn test_truthiness() {
        assert!(truthy(-3));
        assert!(!truthy(0));
        assert_eq!(flag(true), 1);
        assert_eq!(flag(false), 0);
    }
}
