use slate::{
    CanvasModel, CompositeMode, DrawOp, DrawTarget, Position, Region, Rgba, Size, SlateError,
    batch,
};

/// Straight-alpha RGBA of the pixel at (x, y).
fn px(data: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * width + x) * 4) as usize;
    [data[i], data[i + 1], data[i + 2], data[i + 3]]
}

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn filled(width: u32, height: u32, color: &Rgba) -> CanvasModel {
    let blank = CanvasModel::new(Size::new(width, height)).unwrap();
    batch(
        &[
            DrawOp::fill_style(color),
            DrawOp::Rect(Position::new(0.0, 0.0), Size::new(width, height)),
            DrawOp::Fill,
        ],
        &blank,
    )
    .unwrap()
}

#[test]
fn ops_apply_in_order_and_styles_persist() {
    let blank = CanvasModel::new(Size::new(32, 32)).unwrap();
    let drawn = batch(
        &[
            DrawOp::fill_style(&Rgba::rgb(255, 0, 0)),
            DrawOp::Rect(Position::new(0.0, 0.0), Size::new(12, 12)),
            DrawOp::Fill,
            DrawOp::BeginPath,
            DrawOp::fill_style(&Rgba::rgb(0, 0, 255)),
            DrawOp::Rect(Position::new(20.0, 20.0), Size::new(12, 12)),
            DrawOp::Fill,
        ],
        &blank,
    )
    .unwrap();

    let data = drawn.image_data();
    assert_eq!(px(&data, 32, 5, 5), RED);
    assert_eq!(px(&data, 32, 25, 25), BLUE);
    assert_eq!(px(&data, 32, 16, 16), [0, 0, 0, 0]);
}

#[test]
fn later_ops_paint_over_earlier_ones() {
    let blank = CanvasModel::new(Size::new(16, 16)).unwrap();
    let drawn = batch(
        &[
            DrawOp::fill_style(&Rgba::rgb(255, 0, 0)),
            DrawOp::Rect(Position::new(0.0, 0.0), Size::new(16, 16)),
            DrawOp::Fill,
            DrawOp::BeginPath,
            DrawOp::fill_style(&Rgba::rgb(0, 0, 255)),
            DrawOp::Rect(Position::new(0.0, 0.0), Size::new(16, 16)),
            DrawOp::Fill,
        ],
        &blank,
    )
    .unwrap();

    assert_eq!(px(&drawn.image_data(), 16, 8, 8), BLUE);
}

#[test]
fn clear_rect_resets_only_its_region() {
    let red = filled(16, 16, &Rgba::rgb(255, 0, 0));
    let cleared = batch(
        &[DrawOp::ClearRect(Position::new(4.0, 4.0), Size::new(8, 8))],
        &red,
    )
    .unwrap();

    let data = cleared.image_data();
    assert_eq!(px(&data, 16, 8, 8), [0, 0, 0, 0]);
    assert_eq!(px(&data, 16, 1, 1), RED);
    assert_eq!(px(&data, 16, 14, 14), RED);
}

#[test]
fn clear_rect_ignores_alpha_and_composite_state() {
    let red = filled(16, 16, &Rgba::rgb(255, 0, 0));
    let cleared = batch(
        &[
            DrawOp::GlobalAlpha(0.25),
            DrawOp::CompositeMode(CompositeMode::DestinationOver),
            DrawOp::ClearRect(Position::new(0.0, 0.0), Size::new(16, 16)),
        ],
        &red,
    )
    .unwrap();

    assert!(cleared.image_data().iter().all(|&b| b == 0));
}

#[test]
fn global_alpha_scales_fill_coverage() {
    let blank = CanvasModel::new(Size::new(8, 8)).unwrap();
    let drawn = batch(
        &[
            DrawOp::GlobalAlpha(0.5),
            DrawOp::fill_style(&Rgba::rgb(255, 0, 0)),
            DrawOp::Rect(Position::new(0.0, 0.0), Size::new(8, 8)),
            DrawOp::Fill,
        ],
        &blank,
    )
    .unwrap();

    let [r, _, _, a] = px(&drawn.image_data(), 8, 4, 4);
    assert!((126..=130).contains(&a), "alpha {a} not near half coverage");
    assert!(r >= 250, "red channel {r} lost in the alpha round trip");
}

#[test]
fn destination_over_keeps_existing_pixels_on_top() {
    let red = filled(8, 8, &Rgba::rgb(255, 0, 0));
    let drawn = batch(
        &[
            DrawOp::CompositeMode(CompositeMode::DestinationOver),
            DrawOp::fill_style(&Rgba::rgb(0, 0, 255)),
            DrawOp::Rect(Position::new(0.0, 0.0), Size::new(8, 8)),
            DrawOp::Fill,
        ],
        &red,
    )
    .unwrap();

    assert_eq!(px(&drawn.image_data(), 8, 4, 4), RED);
}

#[test]
fn put_image_data_writes_pixels_verbatim() {
    let blank = CanvasModel::new(Size::new(4, 4)).unwrap();
    let patch: Vec<u8> = [0u8, 255, 0, 255].repeat(4);
    let drawn = batch(
        &[DrawOp::PutImageData {
            data: patch,
            size: Size::new(2, 2),
            position: Position::new(1.0, 1.0),
        }],
        &blank,
    )
    .unwrap();

    let data = drawn.image_data();
    assert_eq!(px(&data, 4, 1, 1), [0, 255, 0, 255]);
    assert_eq!(px(&data, 4, 2, 2), [0, 255, 0, 255]);
    assert_eq!(px(&data, 4, 0, 0), [0, 0, 0, 0]);
    assert_eq!(px(&data, 4, 3, 3), [0, 0, 0, 0]);
}

#[test]
fn put_image_data_replaces_the_rectangle_alpha_included() {
    let red = filled(4, 4, &Rgba::rgb(255, 0, 0));
    // Top-left sample transparent, the rest opaque green.
    let mut patch: Vec<u8> = [0u8, 255, 0, 255].repeat(4);
    patch[..4].copy_from_slice(&[0, 0, 0, 0]);
    let drawn = batch(
        &[DrawOp::PutImageData {
            data: patch,
            size: Size::new(2, 2),
            position: Position::new(1.0, 1.0),
        }],
        &red,
    )
    .unwrap();

    let data = drawn.image_data();
    // The transparent sample punches through the red underneath.
    assert_eq!(px(&data, 4, 1, 1), [0, 0, 0, 0]);
    assert_eq!(px(&data, 4, 2, 1), [0, 255, 0, 255]);
    assert_eq!(px(&data, 4, 2, 2), [0, 255, 0, 255]);
    assert_eq!(px(&data, 4, 0, 0), RED);
    assert_eq!(px(&data, 4, 3, 3), RED);
}

#[test]
fn put_image_data_rejects_mismatched_length() {
    let blank = CanvasModel::new(Size::new(4, 4)).unwrap();
    let err = batch(
        &[DrawOp::PutImageData {
            data: vec![0u8; 7],
            size: Size::new(2, 2),
            position: Position::new(0.0, 0.0),
        }],
        &blank,
    )
    .unwrap_err();
    assert!(matches!(err, SlateError::Validation(_)));
}

#[test]
fn draw_image_at_position_keeps_native_size() {
    let red = filled(2, 2, &Rgba::rgb(255, 0, 0));
    let blank = CanvasModel::new(Size::new(8, 8)).unwrap();
    let drawn = batch(
        &[DrawOp::DrawImage(
            red.clone(),
            DrawTarget::At(Position::new(3.0, 3.0)),
        )],
        &blank,
    )
    .unwrap();

    let data = drawn.image_data();
    assert_eq!(px(&data, 8, 3, 3), RED);
    assert_eq!(px(&data, 8, 4, 4), RED);
    assert_eq!(px(&data, 8, 6, 6), [0, 0, 0, 0]);
    // The source survives being drawn.
    assert_eq!(px(&red.image_data(), 2, 0, 0), RED);
}

#[test]
fn draw_image_scaled_stretches_to_the_target_size() {
    let red = filled(1, 1, &Rgba::rgb(255, 0, 0));
    let blank = CanvasModel::new(Size::new(8, 8)).unwrap();
    let drawn = batch(
        &[DrawOp::DrawImage(
            red,
            DrawTarget::Scaled(Position::new(0.0, 0.0), Size::new(8, 8)),
        )],
        &blank,
    )
    .unwrap();

    let data = drawn.image_data();
    assert_eq!(px(&data, 8, 1, 1), RED);
    assert_eq!(px(&data, 8, 6, 6), RED);
}

#[test]
fn draw_image_crop_scaled_samples_only_the_crop() {
    // Left half red, right half blue.
    let blank = CanvasModel::new(Size::new(4, 4)).unwrap();
    let source = batch(
        &[
            DrawOp::fill_style(&Rgba::rgb(255, 0, 0)),
            DrawOp::Rect(Position::new(0.0, 0.0), Size::new(2, 4)),
            DrawOp::Fill,
            DrawOp::BeginPath,
            DrawOp::fill_style(&Rgba::rgb(0, 0, 255)),
            DrawOp::Rect(Position::new(2.0, 0.0), Size::new(2, 4)),
            DrawOp::Fill,
        ],
        &blank,
    )
    .unwrap();

    let dest = CanvasModel::new(Size::new(8, 8)).unwrap();
    let drawn = batch(
        &[DrawOp::DrawImage(
            source,
            DrawTarget::CropScaled(
                Region::new(Position::new(2.0, 0.0), Size::new(2, 4)),
                Region::new(Position::new(0.0, 0.0), Size::new(8, 8)),
            ),
        )],
        &dest,
    )
    .unwrap();

    let data = drawn.image_data();
    assert_eq!(px(&data, 8, 2, 4), BLUE);
    assert_eq!(px(&data, 8, 6, 4), BLUE);
}

#[test]
fn draw_image_with_zero_crop_fails() {
    let red = filled(2, 2, &Rgba::rgb(255, 0, 0));
    let blank = CanvasModel::new(Size::new(8, 8)).unwrap();
    let err = batch(
        &[DrawOp::DrawImage(
            red,
            DrawTarget::CropScaled(
                Region::new(Position::new(0.0, 0.0), Size::new(0, 2)),
                Region::new(Position::new(0.0, 0.0), Size::new(4, 4)),
            ),
        )],
        &blank,
    )
    .unwrap_err();
    assert!(matches!(err, SlateError::Validation(_)));
}

#[test]
fn text_before_font_is_a_contract_violation() {
    let blank = CanvasModel::new(Size::new(8, 8)).unwrap();
    let err = batch(
        &[DrawOp::FillText("hi".to_string(), Position::new(0.0, 0.0))],
        &blank,
    )
    .unwrap_err();
    assert!(matches!(err, SlateError::Validation(_)));
}

#[test]
fn stroke_rect_leaves_the_interior_untouched() {
    let blank = CanvasModel::new(Size::new(16, 16)).unwrap();
    let drawn = batch(
        &[
            DrawOp::stroke_style(&Rgba::rgb(255, 0, 0)),
            DrawOp::LineWidth(2.0),
            DrawOp::StrokeRect(Position::new(2.0, 2.0), Size::new(12, 12)),
        ],
        &blank,
    )
    .unwrap();

    let data = drawn.image_data();
    assert_eq!(px(&data, 16, 8, 8), [0, 0, 0, 0]);
    let [r, _, _, a] = px(&data, 16, 8, 2);
    assert!(r > 200 && a > 200, "edge pixel not stroked: r={r} a={a}");
}

#[test]
fn stroked_path_follows_move_and_line_ops() {
    let blank = CanvasModel::new(Size::new(16, 16)).unwrap();
    let drawn = batch(
        &[
            DrawOp::stroke_style(&Rgba::rgb(0, 0, 255)),
            DrawOp::LineWidth(4.0),
            DrawOp::BeginPath,
            DrawOp::MoveTo(Position::new(0.0, 8.0)),
            DrawOp::LineTo(Position::new(16.0, 8.0)),
            DrawOp::Stroke,
        ],
        &blank,
    )
    .unwrap();

    let data = drawn.image_data();
    let [_, _, b, a] = px(&data, 16, 8, 8);
    assert!(b > 200 && a > 200, "line center not stroked: b={b} a={a}");
    assert_eq!(px(&data, 16, 8, 1), [0, 0, 0, 0]);
}
