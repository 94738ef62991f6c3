use nsw_index::Index;

fn main() {
    let mut index = Index::new(rgb_distance);
    let colors = [
        (Point([255, 0, 0]), "red"),
        (Point([0, 255, 0]), "green"),
        (Point([0, 0, 255]), "blue"),
        (Point([255, 255, 0]), "yellow"),
        (Point([0, 255, 255]), "cyan"),
        (Point([255, 0, 255]), "magenta"),
    ];
    for (point, _) in &colors {
        index.add(*point);
    }

    let query = Point([204, 85, 0]);
    let nearest = index.find_neighbors(&query, 1).unwrap();
    let closest_point = nearest.closest().unwrap();
    let name = colors.iter().find(|(p, _)| p == closest_point).unwrap().1;
    println!("{name}");
}

fn rgb_distance(a: &Point, b: &Point) -> f64 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(x, y)| ((*x as f64) - (*y as f64)).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Point([isize; 3]);
