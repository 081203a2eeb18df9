use rand::Rng;
use tracing::debug;

use crate::config::{FoodPlacement, GridSize, MAX_FOOD_ATTEMPTS};
use crate::snake::{Position, Snake};

/// Places food with the given policy.
#[must_use]
pub fn place<R: Rng + ?Sized>(
    policy: FoodPlacement,
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
) -> Option<Position> {
    match policy {
        FoodPlacement::Sampled => place_food(rng, bounds, snake),
        FoodPlacement::Exact => place_food_exact(rng, bounds, snake),
    }
}

/// Draws random cells until one is free of the snake.
///
/// Gives up after [`MAX_FOOD_ATTEMPTS`] draws and returns `None`. On a board
/// where the snake covers most cells this can miss a free cell that exists;
/// the game then runs on without food until the next placement.
#[must_use]
pub fn place_food<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
) -> Option<Position> {
    let width = i32::from(bounds.width);
    let height = i32::from(bounds.height);

    for _ in 0..MAX_FOOD_ATTEMPTS {
        let candidate = Position::new(rng.gen_range(0..width), rng.gen_range(0..height));
        if !snake.occupies(candidate) {
            return Some(candidate);
        }
    }

    debug!(
        attempts = MAX_FOOD_ATTEMPTS,
        snake_len = snake.len(),
        "food placement gave up"
    );
    None
}

/// Picks uniformly among all cells not occupied by the snake.
///
/// Returns `None` only when the snake fills the board.
#[must_use]
pub fn place_food_exact<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
) -> Option<Position> {
    let mut candidates = Vec::with_capacity(bounds.total_cells().saturating_sub(snake.len()));

    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let position = Position { x, y };
            if !snake.occupies(position) {
                candidates.push(position);
            }
        }
    }

    if candidates.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::{FoodPlacement, GridSize};
    use crate::snake::{Position, Snake};

    use super::{place, place_food, place_food_exact};

    fn row_snake() -> Snake {
        Snake::from_segments(vec![
            Position::new(2, 0),
            Position::new(1, 0),
            Position::new(0, 0),
        ])
    }

    #[test]
    fn sampled_food_never_overlaps_snake() {
        let mut rng = StdRng::seed_from_u64(7);
        let snake = row_snake();
        let bounds = GridSize::new(8, 6);

        for _ in 0..100 {
            let food = place_food(&mut rng, bounds, &snake).expect("sparse board has room");
            assert!(!snake.occupies(food));
            assert!(food.is_within_bounds(bounds));
        }
    }

    #[test]
    fn exact_food_never_overlaps_snake() {
        let mut rng = StdRng::seed_from_u64(11);
        let snake = row_snake();

        for _ in 0..100 {
            let food = place_food_exact(&mut rng, GridSize::new(4, 2), &snake)
                .expect("five cells are free");
            assert!(!snake.occupies(food));
        }
    }

    #[test]
    fn exact_food_finds_the_single_free_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let snake = row_snake();

        let food = place_food_exact(&mut rng, GridSize::new(4, 1), &snake);

        assert_eq!(food, Some(Position::new(3, 0)));
    }

    #[test]
    fn full_board_yields_no_food() {
        let mut rng = StdRng::seed_from_u64(5);
        let snake = row_snake();
        let bounds = GridSize::new(3, 1);

        assert_eq!(place_food(&mut rng, bounds, &snake), None);
        assert_eq!(place_food_exact(&mut rng, bounds, &snake), None);
    }

    #[test]
    fn policy_dispatch_honours_exact_mode() {
        let mut rng = StdRng::seed_from_u64(9);
        let snake = row_snake();

        let food = place(FoodPlacement::Exact, &mut rng, GridSize::new(4, 1), &snake);

        assert_eq!(food, Some(Position::new(3, 0)));
    }
}
