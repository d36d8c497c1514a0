use crate::model::lit;
use crate::traits::{DynamicalSystem, Scalar, Steppable};

/// Classic Runge-Kutta 4th Order Solver
///
/// Stage buffers are allocated once for the system dimension and reused by
/// every step, so a solver instance serves one trajectory at a time.
pub struct RK4<T: Scalar> {
    k1: Vec<T>,
    k2: Vec<T>,
    k3: Vec<T>,
    k4: Vec<T>,
    tmp: Vec<T>,
}

impl<T: Scalar> RK4<T> {
    pub fn new(dim: usize) -> Self {
        let z = T::zero();
        Self {
            k1: vec![z; dim],
            k2: vec![z; dim],
            k3: vec![z; dim],
            k4: vec![z; dim],
            tmp: vec![z; dim],
        }
    }
}

impl<T: Scalar> Steppable<T> for RK4<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T) {
        let half: T = lit(0.5);
        let sixth: T = lit(1.0 / 6.0);
        let two: T = lit(2.0);

        let t0 = *t;

        // k1 = f(t, y)
        system.apply(t0, state, &mut self.k1);

        // k2 = f(t + dt/2, y + dt*k1/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k1[i] * half;
        }
        system.apply(t0 + dt * half, &self.tmp, &mut self.k2);

        // k3 = f(t + dt/2, y + dt*k2/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k2[i] * half;
        }
        system.apply(t0 + dt * half, &self.tmp, &mut self.k3);

        // k4 = f(t + dt, y + dt*k3)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k3[i];
        }
        system.apply(t0 + dt, &self.tmp, &mut self.k4);

        // y_next = y + dt/6 * (k1 + 2k2 + 2k3 + k4)
        for i in 0..state.len() {
            state[i] = state[i]
                + dt * sixth * (self.k1[i] + two * self.k2[i] + two * self.k3[i] + self.k4[i]);
        }

        *t = t0 + dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GoodwinModel, ModelParameters};

    struct Constant;

    impl DynamicalSystem<f64> for Constant {
        fn dimension(&self) -> usize {
            1
        }

        fn apply(&self, _t: f64, _x: &[f64], out: &mut [f64]) {
            out[0] = 1.0;
        }
    }

    struct Growth;

    impl DynamicalSystem<f64> for Growth {
        fn dimension(&self) -> usize {
            1
        }

        fn apply(&self, _t: f64, x: &[f64], out: &mut [f64]) {
            out[0] = x[0];
        }
    }

    struct Clock;

    impl DynamicalSystem<f64> for Clock {
        fn dimension(&self) -> usize {
            1
        }

        fn apply(&self, t: f64, _x: &[f64], out: &mut [f64]) {
            out[0] = 3.0 * t * t;
        }
    }

    #[test]
    fn constant_field_is_integrated_exactly() {
        let mut solver = RK4::<f64>::new(1);
        let mut t = 0.0;
        let mut state = [0.0];
        solver.step(&Constant, &mut t, &mut state, 0.5);
        assert!((t - 0.5).abs() < 1e-15);
        assert!((state[0] - 0.5).abs() < 1e-15);
    }

    #[test]
    fn linear_growth_matches_fourth_order_taylor_polynomial() {
        let mut solver = RK4::<f64>::new(1);
        let h = 0.1;
        let mut t = 0.0;
        let mut state = [1.0];
        solver.step(&Growth, &mut t, &mut state, h);

        let taylor = 1.0 + h + h * h / 2.0 + h.powi(3) / 6.0 + h.powi(4) / 24.0;
        assert!((state[0] - taylor).abs() < 1e-14);
    }

    #[test]
    fn stages_see_intermediate_times() {
        // x' = 3t^2 is a cubic, which RK4 integrates exactly.
        let mut solver = RK4::<f64>::new(1);
        let mut t = 1.0;
        let mut state = [1.0];
        solver.step(&Clock, &mut t, &mut state, 0.5);
        assert!((state[0] - 1.5f64.powi(3)).abs() < 1e-12);
        assert!((t - 1.5).abs() < 1e-15);
    }

    #[test]
    fn goodwin_step_stays_close_to_euler_for_tiny_steps() {
        let model = GoodwinModel::new(ModelParameters::new(0.9, 0.02, 0.02, 0.02, 0.04));
        let mut solver = RK4::<f64>::new(2);
        let mut t = 0.0;
        let mut state = [0.9, 0.7];
        let mut slope = [0.0; 2];
        model.apply(0.0, &state[..], &mut slope[..]);

        let dt = 1e-4;
        solver.step(&model, &mut t, &mut state, dt);
        assert!((state[0] - (0.9 + dt * slope[0])).abs() < 1e-9);
        assert!((state[1] - (0.7 + dt * slope[1])).abs() < 1e-9);
    }

    #[test]
    fn non_finite_input_is_not_trapped() {
        let mut solver = RK4::<f64>::new(1);
        let mut t = 0.0;
        let mut state = [f64::NAN];
        solver.step(&Growth, &mut t, &mut state, 0.1);
        assert!(state[0].is_nan());
    }
}
