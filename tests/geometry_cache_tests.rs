use chart_stream::api::{BarSeries, BarStyle, CandleSeries, CandleStyle, SeriesDrawer};
use chart_stream::core::{
    BarShapes, Bucket, Candle, CandleShapes, DataSource, DrawConfig, GeometryCache, Viewport,
};
use chart_stream::render::{Color, RecordingPainter};
use chrono::{DateTime, Utc};

fn candle(open: f64, high: f64, low: f64, close: f64) -> Candle {
    Candle::new(DateTime::<Utc>::UNIX_EPOCH, open, high, low, close).expect("valid candle")
}

fn candles() -> Vec<Candle> {
    vec![
        candle(10.0, 13.0, 9.0, 12.0),
        candle(12.0, 13.0, 10.0, 11.0),
        candle(11.0, 11.5, 10.5, 11.0),
    ]
}

#[test]
fn ensure_is_idempotent() {
    let source = DataSource::with_items(candles());
    let mut cache = GeometryCache::new(CandleShapes::default());

    cache.ensure(&source, 3);
    let primary = cache.bucket(Bucket::Primary).to_vec();
    let secondary = cache.bucket(Bucket::Secondary).to_vec();

    cache.ensure(&source, 3);
    cache.ensure(&source, 1);
    assert_eq!(cache.cache_end(), 3);
    assert_eq!(cache.bucket(Bucket::Primary), primary.as_slice());
    assert_eq!(cache.bucket(Bucket::Secondary), secondary.as_slice());
}

#[test]
fn buckets_stay_aligned_per_item() {
    let source = DataSource::with_items(candles());
    let mut cache = GeometryCache::new(CandleShapes::default());
    cache.ensure(&source, 3);

    let primary = cache.bucket(Bucket::Primary);
    let secondary = cache.bucket(Bucket::Secondary);
    assert_eq!(primary.len(), 6);
    assert_eq!(secondary.len(), 6);
    for slot in 0..6 {
        assert!(primary[slot].is_some() != secondary[slot].is_some());
    }

    // item 0 grows, item 1 falls, item 2 is flat and counts as growing
    assert!(primary[0].is_some() && primary[1].is_some());
    assert!(secondary[2].is_some() && secondary[3].is_some());
    assert!(primary[4].is_some() && primary[5].is_some());
}

#[test]
fn candle_body_and_wick_are_centered() {
    let source = DataSource::with_items(candles());
    let mut cache = GeometryCache::new(CandleShapes::default());
    cache.ensure(&source, 1);

    let body = cache.bucket(Bucket::Primary)[0].expect("body");
    let wick = cache.bucket(Bucket::Primary)[1].expect("wick");
    assert!((body.x - 0.025).abs() <= 1e-12);
    assert_eq!((body.y, body.height), (10.0, 2.0));
    assert!((wick.x - 0.425).abs() <= 1e-12);
    assert_eq!((wick.y, wick.height), (9.0, 4.0));
}

#[test]
fn flat_candle_body_gets_minimum_height() {
    let source = DataSource::with_items(candles());
    let mut cache = GeometryCache::new(CandleShapes::default());
    cache.ensure(&source, 3);

    let body = cache.bucket(Bucket::Primary)[4].expect("flat body");
    assert_eq!(body.height, 0.01);
}

#[test]
fn appends_extend_without_touching_cached_items() {
    let mut source = DataSource::with_items(vec![1.0, -2.0]);
    let mut cache = GeometryCache::new(BarShapes::default());
    cache.ensure(&source, 2);
    let before = cache.bucket(Bucket::Primary)[0];

    source.append(3.0);
    cache.ensure(&source, 3);
    assert_eq!(cache.cache_end(), 3);
    assert_eq!(cache.bucket(Bucket::Primary)[0], before);
    assert!(cache.bucket(Bucket::Primary)[2].is_some());
}

#[test]
fn clearing_the_source_invalidates_candle_series_cache() {
    let source = DataSource::shared();
    source.borrow_mut().extend(candles());
    let mut series = CandleSeries::new(&source, CandleStyle::default()).expect("series");

    let mut painter = RecordingPainter::new(Viewport::new(400, 300));
    series
        .draw(&DrawConfig::new(0, 3, 0.0, 20.0), &mut painter)
        .expect("draw");
    assert_eq!(series.geometry_cache().cache_end(), 3);

    source.borrow_mut().clear();
    assert_eq!(series.geometry_cache().cache_end(), 0);
    assert!(series.geometry_cache().bucket(Bucket::Primary).is_empty());

    source.borrow_mut().append(candle(5.0, 6.0, 4.0, 5.5));
    series
        .draw(&DrawConfig::new(0, 3, 0.0, 20.0), &mut painter)
        .expect("draw after refill");
    assert_eq!(series.geometry_cache().cache_end(), 1);
}

#[test]
fn clearing_the_source_invalidates_bar_series_cache() {
    let source = DataSource::shared();
    source.borrow_mut().extend([1.0, -1.0, 2.0]);
    let mut series = BarSeries::new(&source, BarStyle::default()).expect("series");

    let mut painter = RecordingPainter::new(Viewport::new(400, 300));
    series
        .draw(&DrawConfig::new(0, 3, -2.0, 2.0), &mut painter)
        .expect("draw");
    assert_eq!(series.geometry_cache().cache_end(), 3);

    source.borrow_mut().clear();
    assert_eq!(series.geometry_cache().cache_end(), 0);
}

#[test]
fn non_finite_bars_are_ignored_by_range_and_drawn_flat() {
    let source = DataSource::shared();
    source.borrow_mut().extend([2.0, f64::NAN, -1.0, f64::INFINITY]);
    let mut series = BarSeries::new(&source, BarStyle::default()).expect("series");

    let config = DrawConfig::new(0, 4, -2.0, 3.0);
    let range = series.preferred_range(&config).expect("finite values visible");
    assert_eq!((range.low, range.high), (-1.0, 2.0));

    let mut painter = RecordingPainter::new(Viewport::new(400, 300));
    series.draw(&config, &mut painter).expect("draw");
    assert_eq!(painter.stats().rects_filled, 4);

    let cache = series.geometry_cache();
    for slot in [1, 3] {
        let flat = cache.bucket(Bucket::Secondary)[slot].expect("baseline bar");
        assert_eq!(flat.height, 0.0);
        assert!(cache.bucket(Bucket::Primary)[slot].is_none());
    }
}

#[test]
fn only_non_finite_bars_give_no_preferred_range() {
    let source = DataSource::shared();
    source.borrow_mut().extend([f64::NAN, f64::NEG_INFINITY]);
    let series = BarSeries::new(&source, BarStyle::default()).expect("series");
    assert!(series.preferred_range(&DrawConfig::new(0, 2, 0.0, 1.0)).is_none());
}

#[test]
fn dropped_series_unsubscribes_from_source() {
    let source = DataSource::shared();
    source.borrow_mut().extend([1.0, 2.0]);
    {
        let _series = BarSeries::new(&source, BarStyle::default()).expect("series");
        assert_eq!(source.borrow().listener_count(), 1);
    }
    assert_eq!(source.borrow().listener_count(), 0);
    source.borrow_mut().clear();
}

#[test]
fn render_fills_one_batch_per_color() {
    let source = DataSource::shared();
    source.borrow_mut().extend(candles());
    let mut series = CandleSeries::new(&source, CandleStyle::default()).expect("series");

    let mut painter = RecordingPainter::new(Viewport::new(400, 300));
    series
        .draw(&DrawConfig::new(0, 3, 0.0, 20.0), &mut painter)
        .expect("draw");

    let stats = painter.stats();
    assert_eq!(stats.fill_calls, 2);
    assert_eq!(stats.rects_filled, 6);
    assert_eq!(painter.frame().rects_filled_with(Color::RED).count(), 4);
    assert_eq!(painter.frame().rects_filled_with(Color::GREEN).count(), 2);
}

#[test]
fn render_only_draws_visible_window() {
    let source = DataSource::shared();
    source.borrow_mut().extend(candles());
    let mut series = CandleSeries::new(&source, CandleStyle::default()).expect("series");

    let mut painter = RecordingPainter::new(Viewport::new(400, 300));
    series
        .draw(&DrawConfig::new(1, 2, 0.0, 20.0), &mut painter)
        .expect("draw");

    assert_eq!(painter.stats().fill_calls, 1);
    assert_eq!(painter.frame().rects_filled_with(Color::GREEN).count(), 2);
    assert_eq!(series.geometry_cache().cache_end(), 2);
}

#[test]
fn window_past_the_data_is_clipped() {
    let source = DataSource::shared();
    source.borrow_mut().extend([1.0, 2.0]);
    let mut series = BarSeries::new(&source, BarStyle::default()).expect("series");

    let mut painter = RecordingPainter::new(Viewport::new(400, 300));
    series
        .draw(&DrawConfig::new(0, 50, 0.0, 2.0), &mut painter)
        .expect("draw");
    assert_eq!(painter.stats().rects_filled, 2);
    assert_eq!(series.geometry_cache().cache_end(), 2);
}

#[test]
fn disabled_cache_rebuilds_each_frame() {
    let source = DataSource::shared();
    source.borrow_mut().extend([1.0, -1.0, 2.0, -2.0]);
    let style = BarStyle {
        use_cache: false,
        ..BarStyle::default()
    };
    let mut series = BarSeries::new(&source, style).expect("series");

    let mut first = RecordingPainter::new(Viewport::new(400, 300));
    series
        .draw(&DrawConfig::new(0, 4, -2.0, 2.0), &mut first)
        .expect("first draw");
    let mut second = RecordingPainter::new(Viewport::new(400, 300));
    series
        .draw(&DrawConfig::new(0, 4, -2.0, 2.0), &mut second)
        .expect("second draw");

    assert_eq!(first.frame(), second.frame());
    assert!(!series.geometry_cache().use_cache());
}

#[test]
fn style_geometry_change_drops_cached_shapes() {
    let source = DataSource::shared();
    source.borrow_mut().extend(candles());
    let mut series = CandleSeries::new(&source, CandleStyle::default()).expect("series");

    let mut painter = RecordingPainter::new(Viewport::new(400, 300));
    series
        .draw(&DrawConfig::new(0, 3, 0.0, 20.0), &mut painter)
        .expect("draw");

    let style = CandleStyle {
        body_width: 0.5,
        ..CandleStyle::default()
    };
    series.set_style(style).expect("style");
    assert_eq!(series.geometry_cache().cache_end(), 0);
    assert_eq!(series.geometry_cache().builder().body_width, 0.5);
}

#[test]
fn detached_series_draws_nothing() {
    let source = DataSource::shared();
    source.borrow_mut().extend([1.0, 2.0]);
    let mut series = BarSeries::new(&source, BarStyle::default()).expect("series");
    drop(source);

    assert!(!series.is_attached());
    let config = DrawConfig::new(0, 2, 0.0, 2.0);
    assert_eq!(series.preferred_range(&config), None);

    let mut painter = RecordingPainter::new(Viewport::new(400, 300));
    series.draw(&config, &mut painter).expect("detached draw");
    assert!(painter.frame().is_empty());
}

#[test]
fn invalid_candle_style_is_rejected() {
    let source = DataSource::shared();
    let style = CandleStyle {
        body_width: 1.5,
        ..CandleStyle::default()
    };
    assert!(CandleSeries::new(&source, style).is_err());
}
