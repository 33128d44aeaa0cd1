use rand::SeedableRng;
use rand::rngs::StdRng;
use wavecaptcha::Canvas;
use wavecaptcha::captcha::{BACKGROUND, DistortionParameters, FOREGROUND, distort, distort_with};

#[test]
fn test_distort_preserves_dimensions() {
    let mut rng = StdRng::seed_from_u64(100);
    for width in [10, 11, 37, 215] {
        for height in [10, 19, 80] {
            let mut source = Canvas::new(width, height).unwrap();
            source.fill_rect(3, 3, 6, 6, FOREGROUND);
            let dest = distort(&source, &mut rng);
            assert_eq!(dest.dimensions(), (width, height));
        }
    }
}

#[test]
fn test_blank_canvas_stays_blank() {
    let mut rng = StdRng::seed_from_u64(101);
    for _ in 0..20 {
        let source = Canvas::new(90, 30).unwrap();
        let dest = distort(&source, &mut rng);
        assert!(dest.as_image().pixels().all(|p| p[0] == BACKGROUND));
    }
}

#[test]
fn test_solid_neighbourhoods_map_to_foreground() {
    let mut rng = StdRng::seed_from_u64(102);
    let mut source = Canvas::new(120, 60).unwrap();
    source.fill_rect(30, 15, 90, 45, FOREGROUND);

    for _ in 0..10 {
        let params = DistortionParameters::random(&mut rng);
        let dest = distort_with(&source, &params);
        for y in 0..60_u32 {
            for x in 0..120_u32 {
                let (sx, sy) = params.source_coords(x, y);
                let (ix, iy) = (sx.floor(), sy.floor());
                if (30.0..90.0).contains(&ix) && (15.0..45.0).contains(&iy) {
                    assert_eq!(
                        dest.get_pixel(x.cast_signed(), y.cast_signed()),
                        FOREGROUND,
                        "({x}, {y}) maps into the stroke interior"
                    );
                }
            }
        }
    }
}

#[test]
fn test_warp_moves_pixels() {
    let mut rng = StdRng::seed_from_u64(103);
    let mut source = Canvas::new(100, 50).unwrap();
    source.fill_rect(40, 10, 45, 40, FOREGROUND);
    let dest = distort(&source, &mut rng);
    assert_ne!(dest, source);
}

#[test]
fn test_same_parameters_same_output() {
    let mut rng = StdRng::seed_from_u64(104);
    let mut source = Canvas::new(64, 32).unwrap();
    source.fill_rect(10, 8, 50, 20, FOREGROUND);
    source.draw_line(0, 31, 63, 0, FOREGROUND);
    let params = DistortionParameters::random(&mut rng);

    assert_eq!(distort_with(&source, &params), distort_with(&source, &params));
}
